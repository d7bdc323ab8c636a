use crate::exception::Exception;

/// Memory access surface used by instruction semantics.
///
/// Addresses are linear (segment base already applied by the caller). The
/// `check_*` methods let multi-write operations (PUSHA, FXSAVE, FXRSTOR)
/// validate a whole range up front so a paging fault never leaves partially
/// applied state.
pub trait CpuBus {
    fn read_u8(&mut self, addr: u32) -> Result<u8, Exception>;
    fn read_u16(&mut self, addr: u32) -> Result<u16, Exception>;
    fn read_u32(&mut self, addr: u32) -> Result<u32, Exception>;
    fn read_u64(&mut self, addr: u32) -> Result<u64, Exception>;
    fn read_u128(&mut self, addr: u32) -> Result<u128, Exception>;

    fn write_u8(&mut self, addr: u32, val: u8) -> Result<(), Exception>;
    fn write_u16(&mut self, addr: u32, val: u16) -> Result<(), Exception>;
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), Exception>;
    fn write_u64(&mut self, addr: u32, val: u64) -> Result<(), Exception>;
    fn write_u128(&mut self, addr: u32, val: u128) -> Result<(), Exception>;

    fn check_readable(&mut self, addr: u32, len: u32) -> Result<(), Exception>;
    fn check_writable(&mut self, addr: u32, len: u32) -> Result<(), Exception>;
}

/// Identity-mapped memory bus used by unit tests.
#[derive(Debug, Clone)]
pub struct FlatTestBus {
    mem: Vec<u8>,
}

impl FlatTestBus {
    pub fn new(size: usize) -> Self {
        Self { mem: vec![0; size] }
    }

    pub fn load(&mut self, addr: u32, data: &[u8]) {
        let start = addr as usize;
        let end = start + data.len();
        self.mem[start..end].copy_from_slice(data);
    }

    pub fn slice(&self, addr: u32, len: usize) -> &[u8] {
        let start = addr as usize;
        let end = start + len;
        &self.mem[start..end]
    }

    fn in_range(&self, addr: u32, len: u32) -> bool {
        (addr as u64 + len as u64) <= self.mem.len() as u64
    }
}

impl CpuBus for FlatTestBus {
    fn read_u8(&mut self, addr: u32) -> Result<u8, Exception> {
        self.mem
            .get(addr as usize)
            .copied()
            .ok_or(Exception::PageFault { addr, write: false })
    }

    fn read_u16(&mut self, addr: u32) -> Result<u16, Exception> {
        let lo = self.read_u8(addr)? as u16;
        let hi = self.read_u8(addr + 1)? as u16;
        Ok(lo | (hi << 8))
    }

    fn read_u32(&mut self, addr: u32) -> Result<u32, Exception> {
        let mut v = 0u32;
        for i in 0..4 {
            v |= (self.read_u8(addr + i)? as u32) << (i * 8);
        }
        Ok(v)
    }

    fn read_u64(&mut self, addr: u32) -> Result<u64, Exception> {
        let mut v = 0u64;
        for i in 0..8 {
            v |= (self.read_u8(addr + i)? as u64) << (i * 8);
        }
        Ok(v)
    }

    fn read_u128(&mut self, addr: u32) -> Result<u128, Exception> {
        let mut v = 0u128;
        for i in 0..16 {
            v |= (self.read_u8(addr + i)? as u128) << (i * 8);
        }
        Ok(v)
    }

    fn write_u8(&mut self, addr: u32, val: u8) -> Result<(), Exception> {
        let slot = self
            .mem
            .get_mut(addr as usize)
            .ok_or(Exception::PageFault { addr, write: true })?;
        *slot = val;
        Ok(())
    }

    fn write_u16(&mut self, addr: u32, val: u16) -> Result<(), Exception> {
        self.write_u8(addr, (val & 0xFF) as u8)?;
        self.write_u8(addr + 1, (val >> 8) as u8)?;
        Ok(())
    }

    fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), Exception> {
        for i in 0..4 {
            self.write_u8(addr + i, (val >> (i * 8)) as u8)?;
        }
        Ok(())
    }

    fn write_u64(&mut self, addr: u32, val: u64) -> Result<(), Exception> {
        for i in 0..8 {
            self.write_u8(addr + i, (val >> (i * 8)) as u8)?;
        }
        Ok(())
    }

    fn write_u128(&mut self, addr: u32, val: u128) -> Result<(), Exception> {
        for i in 0..16 {
            self.write_u8(addr + i, (val >> (i * 8)) as u8)?;
        }
        Ok(())
    }

    fn check_readable(&mut self, addr: u32, len: u32) -> Result<(), Exception> {
        if self.in_range(addr, len) {
            Ok(())
        } else {
            Err(Exception::PageFault { addr, write: false })
        }
    }

    fn check_writable(&mut self, addr: u32, len: u32) -> Result<(), Exception> {
        if self.in_range(addr, len) {
            Ok(())
        } else {
            Err(Exception::PageFault { addr, write: true })
        }
    }
}
