use std::sync::Arc;

use bbs_host::exported::galsbl::{
    BTUCHI, BTUCLI, BTUEBA, BTUIBA, BTUICA, BTUINJ, BTUOBA, BTUPBC, BTURNO, BTUTRG, BTUXNF,
    CHIOUS, NO_SUCH_CHANNEL,
};
use bbs_host::{
    CallContext, ChannelTable, HostConfig, HostError, HostFunctionDispatcher, ModuleMemory,
};
use bbs_mem::{FarPointer, HostSegment, SegmentedMemory};
use pretty_assertions::assert_eq;

const DATA: u16 = 0x0002;

struct Host {
    dispatcher: HostFunctionDispatcher,
    channels: Arc<ChannelTable>,
}

impl Host {
    fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    fn with_config(config: HostConfig) -> Self {
        let mut memory = SegmentedMemory::new();
        memory.add_segment(DATA).unwrap();
        let channels = Arc::new(ChannelTable::new());
        let dispatcher = HostFunctionDispatcher::galsbl(
            ModuleMemory::new(memory),
            Arc::clone(&channels),
            Arc::new(config),
        );
        Self {
            dispatcher,
            channels,
        }
    }

    fn call(&self, ordinal: u16, channel: u16, params: &[u16]) -> (Option<FarPointer>, CallContext) {
        let mut ctx = CallContext::with_parameters(params);
        let result = self.dispatcher.invoke(ordinal, channel, &mut ctx).unwrap();
        (result, ctx)
    }

    fn ax(&self, ordinal: u16, channel: u16, params: &[u16]) -> u16 {
        self.call(ordinal, channel, params).1.registers.ax
    }
}

#[test]
fn registration_number_is_rewritten_on_every_call() {
    let host = Host::new();
    for _ in 0..2 {
        let (result, ctx) = host.call(BTURNO, 0, &[]);
        let pointer = result.unwrap();
        assert_eq!(pointer, FarPointer::new(HostSegment::Registration.number(), 0));
        assert_eq!(ctx.registers.dx_ax(), pointer);

        let memory = host.dispatcher.memory().lock();
        assert_eq!(
            memory.get_span(pointer.segment(), pointer.offset(), 9).unwrap(),
            b"97771457\0"
        );
    }
}

#[test]
fn registration_number_comes_from_config() {
    let config = HostConfig::new("12345678", "info").unwrap();
    let host = Host::with_config(config);
    let pointer = host.call(BTURNO, 0, &[]).0.unwrap();

    let memory = host.dispatcher.memory().lock();
    assert_eq!(memory.get_c_string(pointer.segment(), pointer.offset()).unwrap(), b"12345678");
}

#[test]
fn terminator_knobs_are_acknowledged() {
    let host = Host::new();
    host.channels.open(1);
    assert_eq!(host.ax(BTUOBA, 1, &[1]), 0xFFFF);
    assert_eq!(host.ax(BTUEBA, 1, &[1]), 255);
    for ordinal in [BTUTRG, BTUXNF, BTUPBC] {
        let mut ctx = CallContext::with_parameters(&[1, 0x11, 0x13]);
        ctx.registers.ax = 0x5555;
        host.dispatcher.invoke(ordinal, 1, &mut ctx).unwrap();
        assert_eq!(ctx.registers.ax, 0, "ordinal {ordinal}");
    }
}

#[test]
fn bounded_read_on_empty_queue_writes_nothing() {
    let host = Host::new();
    host.channels.open(1);
    host.dispatcher
        .memory()
        .lock()
        .set_array(DATA, 0x10, b"untouched")
        .unwrap();

    assert_eq!(host.ax(BTUICA, 1, &[1, 0x10, DATA, 5]), 0);
    assert_eq!(
        host.dispatcher.memory().lock().get_span(DATA, 0x10, 9).unwrap(),
        b"untouched"
    );
}

#[test]
fn bounded_read_consumes_the_whole_chunk() {
    let host = Host::new();
    host.channels.open(1).lock().push_inbound(b"0123456789".to_vec());

    assert_eq!(host.ax(BTUICA, 1, &[1, 0x20, DATA, 5]), 5);

    let memory = host.dispatcher.memory().lock();
    assert_eq!(memory.get_span(DATA, 0x20, 6).unwrap(), b"01234\0");
    assert_eq!(host.channels.get(1).unwrap().lock().inbound_len(), 0);
}

#[test]
fn bounded_read_of_short_chunk_returns_its_length() {
    let host = Host::new();
    let queue = host.channels.open(1);
    queue.lock().push_inbound(b"ab".to_vec());
    queue.lock().push_inbound(b"cd".to_vec());

    assert_eq!(host.ax(BTUICA, 1, &[1, 0x30, DATA, 80]), 2);
    assert_eq!(queue.lock().peek_inbound_len(), Some(2));
    assert_eq!(
        host.dispatcher.memory().lock().get_span(DATA, 0x30, 2).unwrap(),
        b"ab"
    );
}

#[test]
fn string_output_queues_one_chunk_without_terminator() {
    let host = Host::new();
    let queue = host.channels.open(3);
    host.dispatcher
        .memory()
        .lock()
        .set_array(DATA, 0x40, b"HELLO\0")
        .unwrap();

    let mut ctx = CallContext::with_parameters(&[3, 0x40, DATA]);
    ctx.registers.ax = 0x1234;
    assert_eq!(host.dispatcher.invoke(CHIOUS, 3, &mut ctx), Ok(None));
    assert_eq!(ctx.registers.ax, 0x1234);

    assert_eq!(queue.lock().drain_outbound(), vec![b"HELLO".to_vec()]);
}

#[test]
fn peek_length_leaves_the_queue_alone() {
    let host = Host::new();
    let queue = host.channels.open(2);

    assert_eq!(host.ax(BTUIBA, 2, &[2]), 0);

    queue.lock().push_inbound(b"1234567".to_vec());
    assert_eq!(host.ax(BTUIBA, 2, &[2]), 7);
    assert_eq!(host.ax(BTUIBA, 2, &[2]), 7);
    assert_eq!(queue.lock().pop_inbound(), Some(b"1234567".to_vec()));
}

#[test]
fn peek_length_of_unknown_channel_is_a_sentinel() {
    let host = Host::new();
    assert_eq!(host.ax(BTUIBA, 0, &[9]), NO_SUCH_CHANNEL);
}

#[test]
fn clear_input_drops_every_chunk() {
    let host = Host::new();
    let queue = host.channels.open(1);
    queue.lock().push_inbound(b"a".to_vec());
    queue.lock().push_inbound(b"b".to_vec());

    assert_eq!(host.ax(BTUCLI, 1, &[1]), 0);
    assert_eq!(queue.lock().inbound_len(), 0);
}

#[test]
fn status_injection_marks_the_channel() {
    let host = Host::new();
    let queue = host.channels.open(4);

    assert_eq!(host.ax(BTUINJ, 0, &[4, 3]), 0);
    assert_eq!(queue.lock().take_status_change(), Some(3));
    assert_eq!(
        host.dispatcher
            .memory()
            .lock()
            .get_word(HostSegment::Status.number(), 0)
            .unwrap(),
        3
    );
}

#[test]
fn interceptor_registration_accepts_only_null() {
    let host = Host::new();
    host.channels.open(1);
    assert_eq!(host.ax(BTUCHI, 1, &[1, 0, 0]), 0);

    let mut ctx = CallContext::with_parameters(&[1, 0x0100, 0x0001]);
    assert!(matches!(
        host.dispatcher.invoke(BTUCHI, 1, &mut ctx),
        Err(HostError::UnsupportedFeature {
            function: "btuchi",
            ..
        })
    ));
}

#[test]
fn mutating_an_unopened_channel_is_fatal() {
    let host = Host::new();
    let mut ctx = CallContext::with_parameters(&[7, 0x10, DATA, 5]);
    assert_eq!(
        host.dispatcher.invoke(BTUICA, 7, &mut ctx),
        Err(HostError::UnknownChannel(7))
    );
}

#[test]
fn missing_parameters_are_reported() {
    let host = Host::new();
    host.channels.open(1);
    let mut ctx = CallContext::with_parameters(&[1, 0x10]);
    assert_eq!(
        host.dispatcher.invoke(BTUICA, 1, &mut ctx),
        Err(HostError::MissingParameter {
            function: "btuica",
            index: 2
        })
    );
}

#[test]
fn unknown_ordinal_is_fatal() {
    let host = Host::new();
    assert_eq!(host.dispatcher.table().module(), "GALGSBL");
    assert_eq!(host.dispatcher.table().name_of(1), None);

    let mut ctx = CallContext::default();
    assert_eq!(
        host.dispatcher.invoke(1, 0, &mut ctx),
        Err(HostError::UnknownOrdinal {
            module: "GALGSBL",
            ordinal: 1
        })
    );
}

#[test]
fn every_call_binds_the_acting_channel() {
    let host = Host::new();
    host.call(BTUOBA, 6, &[6]);
    let user_num = HostSegment::UserNum.number();
    assert_eq!(host.dispatcher.memory().lock().get_word(user_num, 0).unwrap(), 6);

    host.call(BTUEBA, 2, &[2]);
    assert_eq!(host.dispatcher.memory().lock().get_word(user_num, 0).unwrap(), 2);
}

#[test]
fn memory_faults_propagate() {
    let host = Host::new();
    let queue = host.channels.open(1);
    queue.lock().push_inbound(b"abc".to_vec());

    let mut ctx = CallContext::with_parameters(&[1, 0xFFFE, DATA, 3]);
    assert!(matches!(
        host.dispatcher.invoke(BTUICA, 1, &mut ctx),
        Err(HostError::Memory(bbs_mem::MemoryError::OutOfBounds { .. }))
    ));
    assert_eq!(queue.lock().inbound_len(), 1);
}

#[test]
fn failed_read_keeps_the_chunk_queued() {
    let host = Host::new();
    let queue = host.channels.open(1);
    queue.lock().push_inbound(b"abc".to_vec());

    let mut ctx = CallContext::with_parameters(&[1, 0x0010, 0x0077, 3]);
    assert_eq!(
        host.dispatcher.invoke(BTUICA, 1, &mut ctx),
        Err(HostError::Memory(bbs_mem::MemoryError::UnknownSegment(0x0077)))
    );
    assert_eq!(queue.lock().peek_inbound(), Some(&b"abc"[..]));

    // A later read into a valid buffer still sees the input.
    assert_eq!(host.ax(BTUICA, 1, &[1, 0x0010, DATA, 3]), 3);
    assert_eq!(queue.lock().inbound_len(), 0);
    assert_eq!(
        host.dispatcher.memory().lock().get_span(DATA, 0x0010, 3).unwrap(),
        b"abc"
    );
}
