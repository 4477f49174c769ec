//! Several sessions sharing one module's memory.

use std::sync::Arc;
use std::thread;

use bbs_host::exported::galsbl::{BTUICA, CHIOUS};
use bbs_host::{CallContext, ChannelTable, HostConfig, HostFunctionDispatcher, ModuleMemory};
use bbs_mem::SegmentedMemory;

const DATA: u16 = 0x0002;

#[test]
fn channels_run_concurrently_against_shared_memory() {
    let mut memory = SegmentedMemory::new();
    memory.add_segment(DATA).unwrap();
    let channels = Arc::new(ChannelTable::new());
    let dispatcher = HostFunctionDispatcher::galsbl(
        ModuleMemory::new(memory),
        Arc::clone(&channels),
        Arc::new(HostConfig::default()),
    );

    let handles: Vec<_> = (0..4u16)
        .map(|channel| {
            let queue = channels.open(channel);
            for _ in 0..50 {
                queue.lock().push_inbound(vec![b'a' + channel as u8; 4]);
            }
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                // Each session owns its own 16-byte buffer in the shared segment.
                let buffer = 0x100 + channel * 0x10;
                for _ in 0..50 {
                    let mut ctx = CallContext::with_parameters(&[channel, buffer, DATA, 16]);
                    dispatcher.invoke(BTUICA, channel, &mut ctx).unwrap();
                    assert_eq!(ctx.registers.ax, 4);

                    dispatcher
                        .memory()
                        .lock()
                        .set_byte(DATA, buffer + 4, 0)
                        .unwrap();
                    let mut ctx = CallContext::with_parameters(&[channel, buffer, DATA]);
                    dispatcher.invoke(CHIOUS, channel, &mut ctx).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for channel in 0..4u16 {
        let queue = channels.get(channel).unwrap();
        let mut queue = queue.lock();
        assert_eq!(queue.inbound_len(), 0);
        let out = queue.drain_outbound();
        assert_eq!(out.len(), 50);
        assert!(out.iter().all(|chunk| *chunk == vec![b'a' + channel as u8; 4]));
    }
}
