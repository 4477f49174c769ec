use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bbs_mem::{FarPointer, HostSegment, SegmentedMemory};
use tracing::trace;

use crate::channel::{ChannelHandle, ChannelTable};
use crate::registers::{Register16, RegisterFile};
use crate::{HostConfig, HostError, ModuleMemory, Result};

/// Body of one exported host function.
///
/// Results go to registers through [`HostCall`]; the return value is only `Some`
/// for functions whose C signature yields a far pointer to host-owned data.
pub type HostFn = fn(&mut HostCall<'_>) -> Result<Option<FarPointer>>;

#[derive(Clone, Copy)]
pub struct HostFunction {
    pub name: &'static str,
    pub handler: HostFn,
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordinal to function mapping for one exported module family.
#[derive(Debug, Clone)]
pub struct OrdinalTable {
    module: &'static str,
    functions: HashMap<u16, HostFunction>,
}

impl OrdinalTable {
    pub fn new(module: &'static str) -> Self {
        Self {
            module,
            functions: HashMap::new(),
        }
    }

    /// Adds `handler` under `ordinal`, replacing any earlier registration.
    pub fn register(mut self, ordinal: u16, name: &'static str, handler: HostFn) -> Self {
        self.functions.insert(ordinal, HostFunction { name, handler });
        self
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn get(&self, ordinal: u16) -> Option<&HostFunction> {
        self.functions.get(&ordinal)
    }

    pub fn name_of(&self, ordinal: u16) -> Option<&'static str> {
        self.get(ordinal).map(|function| function.name)
    }

    /// Registered functions in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &HostFunction)> + '_ {
        let mut ordinals: Vec<u16> = self.functions.keys().copied().collect();
        ordinals.sort_unstable();
        ordinals
            .into_iter()
            .filter_map(move |ordinal| self.functions.get(&ordinal).map(|f| (ordinal, f)))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Everything a host function may touch while it runs.
///
/// Module memory is already locked for the duration of the call.
pub struct HostCall<'a> {
    function: &'static str,
    memory: &'a mut SegmentedMemory,
    registers: &'a mut dyn RegisterFile,
    channels: &'a ChannelTable,
    config: &'a HostConfig,
}

impl<'a> HostCall<'a> {
    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn memory(&mut self) -> &mut SegmentedMemory {
        &mut *self.memory
    }

    pub fn channels(&self) -> &'a ChannelTable {
        self.channels
    }

    pub fn config(&self) -> &'a HostConfig {
        self.config
    }

    pub fn parameter(&self, index: usize) -> Result<u16> {
        self.registers
            .parameter(index)
            .ok_or(HostError::MissingParameter {
                function: self.function,
                index,
            })
    }

    /// A far pointer passed as two words: offset at `index`, segment at `index + 1`.
    pub fn far_pointer_parameter(&self, index: usize) -> Result<FarPointer> {
        let offset = self.parameter(index)?;
        let segment = self.parameter(index + 1)?;
        Ok(FarPointer::new(segment, offset))
    }

    /// Queues of an open channel. Addressing a channel that was never opened is a
    /// binary-compatibility fault, not a query result.
    pub fn channel_queue(&self, channel: u16) -> Result<ChannelHandle> {
        self.channels
            .get(channel)
            .ok_or(HostError::UnknownChannel(channel))
    }

    /// Sets AX.
    pub fn set_result(&mut self, value: u16) {
        self.registers.set_register(Register16::Ax, value);
    }

    /// Sets DX:AX (segment in DX).
    pub fn set_far_result(&mut self, pointer: FarPointer) {
        self.registers.set_register(Register16::Ax, pointer.offset());
        self.registers.set_register(Register16::Dx, pointer.segment());
    }
}

/// Routes ordinal calls of one module to their host functions.
///
/// Cloning is cheap; every clone shares the same module memory, channel table and
/// config, so one dispatcher can be handed to each session's execution context.
#[derive(Debug, Clone)]
pub struct HostFunctionDispatcher {
    table: &'static OrdinalTable,
    memory: ModuleMemory,
    channels: Arc<ChannelTable>,
    config: Arc<HostConfig>,
}

impl HostFunctionDispatcher {
    pub fn new(
        table: &'static OrdinalTable,
        memory: ModuleMemory,
        channels: Arc<ChannelTable>,
        config: Arc<HostConfig>,
    ) -> Self {
        Self {
            table,
            memory,
            channels,
            config,
        }
    }

    /// A dispatcher for the GSBL function family.
    pub fn galsbl(memory: ModuleMemory, channels: Arc<ChannelTable>, config: Arc<HostConfig>) -> Self {
        Self::new(crate::exported::galsbl::ordinals(), memory, channels, config)
    }

    pub fn table(&self) -> &'static OrdinalTable {
        self.table
    }

    pub fn memory(&self) -> &ModuleMemory {
        &self.memory
    }

    /// Runs the function registered under `ordinal` on behalf of `channel`.
    ///
    /// The acting channel number is written to word 0 of the user-number segment
    /// first, so module code sees the right session while the call runs.
    pub fn invoke(
        &self,
        ordinal: u16,
        channel: u16,
        registers: &mut dyn RegisterFile,
    ) -> Result<Option<FarPointer>> {
        let function = self.table.get(ordinal).ok_or(HostError::UnknownOrdinal {
            module: self.table.module(),
            ordinal,
        })?;

        let mut memory = self.memory.lock();
        memory.ensure_segment(HostSegment::UserNum);
        memory.set_word(HostSegment::UserNum.number(), 0, channel)?;

        trace!(
            module = self.table.module(),
            ordinal,
            function = function.name,
            channel,
            "host call"
        );

        let mut call = HostCall {
            function: function.name,
            memory: &mut *memory,
            registers,
            channels: &self.channels,
            config: &self.config,
        };
        (function.handler)(&mut call)
    }
}
