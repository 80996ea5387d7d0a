use crate::error::Fault;
use crate::isa::Reg;
use mycora_data::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four vector registers `a`-`d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterFile {
    regs: [Coord; 4],
}

impl RegisterFile {
    #[must_use]
    pub fn get(&self, reg: Reg) -> Coord {
        self.regs[reg.index()]
    }

    pub fn set(&mut self, reg: Reg, value: Coord) {
        self.regs[reg.index()] = value;
    }

    pub fn clear(&mut self) {
        self.regs = [Coord::ZERO; 4];
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reg) in Reg::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", reg.name(), self.get(*reg))?;
        }
        Ok(())
    }
}

/// Bounded stack of addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressStack {
    items: Vec<Coord>,
    depth: usize,
}

impl AddressStack {
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            items: Vec::with_capacity(depth),
            depth,
        }
    }

    pub fn push(&mut self, value: Coord) -> Result<(), Fault> {
        if self.items.len() >= self.depth {
            return Err(Fault::StackOverflow);
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Coord, Fault> {
        self.items.pop().ok_or(Fault::StackUnderflow)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Coord] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_start_zeroed() {
        let regs = RegisterFile::default();
        assert!(Reg::ALL.iter().all(|r| regs.get(*r).is_zero()));
    }

    #[test]
    fn test_register_display() {
        let mut regs = RegisterFile::default();
        regs.set(Reg::B, Coord::new(3, -1));
        assert_eq!(
            regs.to_string(),
            "a=(0, 0) b=(3, -1) c=(0, 0) d=(0, 0)"
        );
    }

    #[test]
    fn test_stack_bounds() {
        let mut stack = AddressStack::new(2);
        assert_eq!(stack.pop(), Err(Fault::StackUnderflow));
        stack.push(Coord::new(1, 1)).unwrap();
        stack.push(Coord::new(2, 2)).unwrap();
        assert_eq!(stack.push(Coord::new(3, 3)), Err(Fault::StackOverflow));
        assert_eq!(stack.pop(), Ok(Coord::new(2, 2)));
        assert_eq!(stack.len(), 1);
    }
}
