//! GALGSBL: the serial/channel I/O library (`btu*` functions).
//!
//! Signatures are given as the C prototypes modules were compiled against. Word
//! parameters arrive left to right; a `char *` takes two words, offset first.

use std::sync::OnceLock;

use bbs_mem::{FarPointer, HostSegment};

use crate::dispatch::{HostCall, OrdinalTable};
use crate::{HostError, Result};

pub const MODULE: &str = "GALGSBL";

pub const BTUCHI: u16 = 4;
pub const BTUCLI: u16 = 6;
pub const BTUIBA: u16 = 19;
pub const BTUINJ: u16 = 21;
pub const BTUOBA: u16 = 36;
pub const BTUPBC: u16 = 39;
pub const BTUTRG: u16 = 49;
pub const BTUXNF: u16 = 60;
pub const CHIOUS: u16 = 63;
pub const BTURNO: u16 = 72;
pub const BTUEBA: u16 = 83;
pub const BTUICA: u16 = 87;

/// Returned by `btuiba` for a channel that does not exist.
pub const NO_SUCH_CHANNEL: u16 = 0xFFFE;

const OK: u16 = 0;

pub fn ordinals() -> &'static OrdinalTable {
    static TABLE: OnceLock<OrdinalTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        OrdinalTable::new(MODULE)
            .register(BTURNO, "bturno", bturno)
            .register(BTUOBA, "btuoba", btuoba)
            .register(BTUTRG, "btutrg", acknowledge)
            .register(BTUINJ, "btuinj", btuinj)
            .register(BTUXNF, "btuxnf", acknowledge)
            .register(BTUPBC, "btupbc", acknowledge)
            .register(BTUICA, "btuica", btuica)
            .register(BTUCLI, "btucli", btucli)
            .register(BTUCHI, "btuchi", btuchi)
            .register(CHIOUS, "chious", chious)
            .register(BTUEBA, "btueba", btueba)
            .register(BTUIBA, "btuiba", btuiba)
    })
}

/// `char bturno[]`: 8-digit registration number plus NUL.
///
/// Result: DX:AX points at the string in the registration segment.
fn bturno(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    let bytes = call.config().registration_bytes();
    let memory = call.memory();
    memory.ensure_segment(HostSegment::Registration);
    memory.set_array(HostSegment::Registration.number(), 0, &bytes)?;

    let pointer = FarPointer::new(HostSegment::Registration.number(), 0);
    call.set_far_result(pointer);
    Ok(Some(pointer))
}

/// `int btuoba(int chan)`: output buffer space available.
///
/// Output is queued, never throttled.
fn btuoba(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    call.set_result(u16::MAX);
    Ok(None)
}

/// `btutrg` (input byte trigger), `btuxnf` (XON/XOFF) and `btupbc` (screen-pause
/// character) configure a terminal that does not exist here.
fn acknowledge(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    call.set_result(OK);
    Ok(None)
}

/// `int btuinj(int chan, int status)`: inject a status code into a channel.
fn btuinj(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    let channel = call.parameter(0)?;
    let status = call.parameter(1)?;
    let queue = call.channel_queue(channel)?;

    let memory = call.memory();
    memory.ensure_segment(HostSegment::Status);
    memory.set_word(HostSegment::Status.number(), 0, status)?;
    queue.lock().inject_status(status);

    call.set_result(OK);
    Ok(None)
}

/// `int btuica(int chan, char *rdbptr, int max)`: read whatever input is
/// available, up to `max` bytes.
///
/// One queued chunk is consumed per call. Bytes past `max` are dropped with it.
/// The chunk stays queued if the destination cannot be written.
fn btuica(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    let channel = call.parameter(0)?;
    let destination = call.far_pointer_parameter(1)?;
    let max = call.parameter(3)?;

    let handle = call.channel_queue(channel)?;
    let mut queue = handle.lock();
    let Some(chunk) = queue.peek_inbound() else {
        call.set_result(0);
        return Ok(None);
    };

    let count = chunk.len().min(usize::from(max));
    call.memory()
        .set_array(destination.segment(), destination.offset(), &chunk[..count])?;
    queue.pop_inbound();

    call.set_result(count as u16);
    Ok(None)
}

/// `int btucli(int chan)`: clear the input buffer.
fn btucli(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    let channel = call.parameter(0)?;
    call.channel_queue(channel)?.lock().clear_inbound();
    call.set_result(OK);
    Ok(None)
}

/// `int btuchi(int chan, char (*rouadr)())`: set an input character interceptor.
///
/// Only clearing the interceptor (a NULL routine) is supported.
fn btuchi(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    let routine = call.far_pointer_parameter(1)?;
    if !routine.is_null() {
        return Err(HostError::UnsupportedFeature {
            function: call.function(),
            detail: format!("input interceptor routine {routine}"),
        });
    }
    call.set_result(OK);
    Ok(None)
}

/// `void chious(int chan, char *string)`: string output via the echo buffer.
fn chious(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    let channel = call.parameter(0)?;
    let string = call.far_pointer_parameter(1)?;
    let queue = call.channel_queue(channel)?;

    let bytes = call
        .memory()
        .get_c_string(string.segment(), string.offset())?
        .to_vec();
    queue.lock().push_outbound(bytes);
    Ok(None)
}

/// `int btueba(int chan)`: echo buffer space, 0 (full) to 255 (empty).
///
/// Echoed output is queued for the client immediately, so the buffer is always
/// empty.
fn btueba(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    call.set_result(255);
    Ok(None)
}

/// `int btuiba(int chan)`: length of the next input chunk, without consuming it.
fn btuiba(call: &mut HostCall<'_>) -> Result<Option<FarPointer>> {
    let channel = call.parameter(0)?;
    let Some(queue) = call.channels().get(channel) else {
        call.set_result(NO_SUCH_CHANNEL);
        return Ok(None);
    };

    let available = queue.lock().peek_inbound_len().unwrap_or(0);
    call.set_result(u16::try_from(available).unwrap_or(u16::MAX));
    Ok(None)
}
