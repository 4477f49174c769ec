use bbs_mem::{FarPointer, SegmentedMemory};

/// 16-bit registers visible to host functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register16 {
    Ax,
    Bx,
    Cx,
    Dx,
    Si,
    Di,
    Bp,
    Sp,
    Cs,
    Ds,
    Es,
    Ss,
    Ip,
    Flags,
}

/// The register/parameter view a host function runs against.
///
/// Host functions read their arguments positionally through [`Self::parameter`] and
/// report results by writing registers: AX for the primary result, DX:AX for far
/// pointers. The executor inspects those registers after the call returns.
pub trait RegisterFile {
    fn register(&self, reg: Register16) -> u16;

    fn set_register(&mut self, reg: Register16, value: u16);

    /// Word parameter `index` of the current call, or `None` if the caller did not
    /// pass that many.
    fn parameter(&self, index: usize) -> Option<u16>;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CpuRegisters {
    pub ax: u16,
    pub bx: u16,
    pub cx: u16,
    pub dx: u16,
    pub si: u16,
    pub di: u16,
    pub bp: u16,
    pub sp: u16,

    pub cs: u16,
    pub ds: u16,
    pub es: u16,
    pub ss: u16,
    pub ip: u16,

    pub flags: u16,
}

impl CpuRegisters {
    pub fn get(&self, reg: Register16) -> u16 {
        match reg {
            Register16::Ax => self.ax,
            Register16::Bx => self.bx,
            Register16::Cx => self.cx,
            Register16::Dx => self.dx,
            Register16::Si => self.si,
            Register16::Di => self.di,
            Register16::Bp => self.bp,
            Register16::Sp => self.sp,
            Register16::Cs => self.cs,
            Register16::Ds => self.ds,
            Register16::Es => self.es,
            Register16::Ss => self.ss,
            Register16::Ip => self.ip,
            Register16::Flags => self.flags,
        }
    }

    pub fn set(&mut self, reg: Register16, value: u16) {
        let slot = match reg {
            Register16::Ax => &mut self.ax,
            Register16::Bx => &mut self.bx,
            Register16::Cx => &mut self.cx,
            Register16::Dx => &mut self.dx,
            Register16::Si => &mut self.si,
            Register16::Di => &mut self.di,
            Register16::Bp => &mut self.bp,
            Register16::Sp => &mut self.sp,
            Register16::Cs => &mut self.cs,
            Register16::Ds => &mut self.ds,
            Register16::Es => &mut self.es,
            Register16::Ss => &mut self.ss,
            Register16::Ip => &mut self.ip,
            Register16::Flags => &mut self.flags,
        };
        *slot = value;
    }

    /// DX:AX as a far pointer (segment in DX, offset in AX).
    pub fn dx_ax(&self) -> FarPointer {
        FarPointer::new(self.dx, self.ax)
    }
}

/// Registers plus the word parameters of one host call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    pub registers: CpuRegisters,
    parameters: Vec<u16>,
}

impl CallContext {
    pub fn new(registers: CpuRegisters, parameters: impl Into<Vec<u16>>) -> Self {
        Self {
            registers,
            parameters: parameters.into(),
        }
    }

    pub fn with_parameters(parameters: &[u16]) -> Self {
        Self::new(CpuRegisters::default(), parameters)
    }

    /// Reads `count` word parameters from the emulated stack.
    ///
    /// The caller has executed a far `CALL`, so `SS:SP` points at the return IP and
    /// CS; parameters start at `SS:SP+4`, leftmost argument first. Offsets wrap
    /// within the stack segment the way SP arithmetic does.
    pub fn from_stack(
        registers: CpuRegisters,
        memory: &SegmentedMemory,
        count: usize,
    ) -> bbs_mem::Result<Self> {
        let parameters = (0..count)
            .map(|index| {
                let offset = registers.sp.wrapping_add(4).wrapping_add((2 * index) as u16);
                memory.get_word(registers.ss, offset)
            })
            .collect::<bbs_mem::Result<Vec<_>>>()?;
        Ok(Self {
            registers,
            parameters,
        })
    }

    pub fn parameters(&self) -> &[u16] {
        &self.parameters
    }
}

impl RegisterFile for CallContext {
    fn register(&self, reg: Register16) -> u16 {
        self.registers.get(reg)
    }

    fn set_register(&mut self, reg: Register16, value: u16) {
        self.registers.set(reg, value);
    }

    fn parameter(&self, index: usize) -> Option<u16> {
        self.parameters.get(index).copied()
    }
}
