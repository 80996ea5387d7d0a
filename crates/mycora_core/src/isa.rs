//! Instruction decoding.
//!
//! Every arena symbol decodes to exactly one [`Instruction`]. Operands are
//! not encoded in the opcode: they are read from the modifier cells that
//! follow it along the organism's heading (`a`-`d` pick registers, `x`/`y`
//! pick an axis). Missing modifiers fall back to per-instruction defaults.

use mycora_data::Heading;
use serde::{Deserialize, Serialize};

/// One of the four vector registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg {
    A,
    B,
    C,
    D,
}

impl Reg {
    pub const ALL: [Reg; 4] = [Reg::A, Reg::B, Reg::C, Reg::D];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Reg::A => 0,
            Reg::B => 1,
            Reg::C => 2,
            Reg::D => 3,
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'a' => Some(Reg::A),
            'b' => Some(Reg::B),
            'c' => Some(Reg::C),
            'd' => Some(Reg::D),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> char {
        match self {
            Reg::A => 'a',
            Reg::B => 'b',
            Reg::C => 'c',
            Reg::D => 'd',
        }
    }
}

/// Component(s) an arithmetic instruction touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    #[default]
    Both,
}

impl Axis {
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// `.` (false) or `:` (true); no-op, addressed by template search.
    Template(bool),
    /// Register or axis modifier executed on its own.
    Modifier,
    /// `^ v > <`
    Turn(Heading),
    /// `J`: ip = r1.
    Jump,
    /// `?`: skip the next cell when r1 is (0, 0).
    IfNotZero,
    /// `=`: skip the next cell unless r1 == r2.
    IfEqual,
    /// `0`
    Zero,
    /// `1`
    One,
    /// `+`
    Inc,
    /// `-`
    Dec,
    /// `~`: r1 = r2 - r3.
    Sub,
    /// `S`
    Push,
    /// `P`
    Pop,
    /// `O`: r1 = own genome origin.
    Origin,
    /// `&`: r1 = address just past the complement of the following template.
    FindTemplate,
    /// `Q`: r2 = (ownership kind, symbol code) of the cell at r1.
    Sense,
    /// `W`: copy the symbol at r1 to r2.
    Copy,
    /// `C`: copy the next offspring cell from the genome, holding ip until done.
    CopyStep,
    /// `@`: claim an offspring buffer of size r1, origin into r2.
    Allocate,
    /// `$`: detach the finished offspring buffer.
    Divide,
    NoOp,
}

impl Instruction {
    #[must_use]
    pub fn decode(symbol: char) -> Self {
        match symbol {
            '.' => Instruction::Template(false),
            ':' => Instruction::Template(true),
            'a' | 'b' | 'c' | 'd' | 'x' | 'y' => Instruction::Modifier,
            '^' => Instruction::Turn(Heading::Up),
            'v' => Instruction::Turn(Heading::Down),
            '<' => Instruction::Turn(Heading::Left),
            '>' => Instruction::Turn(Heading::Right),
            'J' => Instruction::Jump,
            '?' => Instruction::IfNotZero,
            '=' => Instruction::IfEqual,
            '0' => Instruction::Zero,
            '1' => Instruction::One,
            '+' => Instruction::Inc,
            '-' => Instruction::Dec,
            '~' => Instruction::Sub,
            'S' => Instruction::Push,
            'P' => Instruction::Pop,
            'O' => Instruction::Origin,
            '&' => Instruction::FindTemplate,
            'Q' => Instruction::Sense,
            'W' => Instruction::Copy,
            'C' => Instruction::CopyStep,
            '@' => Instruction::Allocate,
            '$' => Instruction::Divide,
            _ => Instruction::NoOp,
        }
    }

    /// Registers used when no modifier cells follow.
    #[must_use]
    pub fn default_registers(self) -> &'static [Reg] {
        match self {
            Instruction::Jump
            | Instruction::IfNotZero
            | Instruction::Zero
            | Instruction::One
            | Instruction::Inc
            | Instruction::Dec
            | Instruction::Push
            | Instruction::Pop
            | Instruction::Origin
            | Instruction::FindTemplate => &[Reg::A],
            Instruction::IfEqual
            | Instruction::Sense
            | Instruction::Copy
            | Instruction::Allocate => &[Reg::A, Reg::B],
            Instruction::Sub => &[Reg::A, Reg::B, Reg::C],
            _ => &[],
        }
    }

    #[must_use]
    pub fn takes_axis(self) -> bool {
        matches!(
            self,
            Instruction::Zero | Instruction::One | Instruction::Inc | Instruction::Dec
        )
    }
}

/// Operands resolved from the modifier cells after an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    regs: [Reg; 3],
    pub axis: Axis,
    /// Modifier cells consumed; the ip skips them.
    pub consumed: usize,
}

impl Operands {
    /// Resolves operands from the cells following the opcode, in heading
    /// order. Stops at the first cell that is not a matching modifier.
    pub fn decode<I>(instruction: Instruction, mut following: I) -> Self
    where
        I: Iterator<Item = char>,
    {
        let defaults = instruction.default_registers();
        let mut regs = [Reg::A, Reg::B, Reg::C];
        regs[..defaults.len()].copy_from_slice(defaults);
        let mut consumed = 0;
        let mut axis = Axis::Both;
        let mut peeked = following.next();

        for slot in regs.iter_mut().take(defaults.len()) {
            match peeked.and_then(Reg::from_symbol) {
                Some(reg) => {
                    *slot = reg;
                    consumed += 1;
                    peeked = following.next();
                }
                None => break,
            }
        }

        if instruction.takes_axis() {
            if let Some(a) = peeked.and_then(Axis::from_symbol) {
                axis = a;
                consumed += 1;
            }
        }

        Self {
            regs,
            axis,
            consumed,
        }
    }

    /// The `n`-th register operand (0-based).
    #[must_use]
    pub fn reg(&self, n: usize) -> Reg {
        self.regs[n.min(2)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mycora_data::ALPHABET;

    #[test]
    fn test_every_alphabet_symbol_decodes_to_something_meaningful() {
        for s in ALPHABET {
            let i = Instruction::decode(s);
            assert_ne!(i, Instruction::NoOp, "symbol {s:?} decoded as noise");
        }
        assert_eq!(Instruction::decode('Z'), Instruction::NoOp);
    }

    #[test]
    fn test_operands_default_without_modifiers() {
        let ops = Operands::decode(Instruction::Copy, "C$".chars());
        assert_eq!(ops.reg(0), Reg::A);
        assert_eq!(ops.reg(1), Reg::B);
        assert_eq!(ops.consumed, 0);
    }

    #[test]
    fn test_operands_partial_modifiers() {
        let ops = Operands::decode(Instruction::Sub, "d>".chars());
        assert_eq!(ops.reg(0), Reg::D);
        assert_eq!(ops.reg(1), Reg::B);
        assert_eq!(ops.reg(2), Reg::C);
        assert_eq!(ops.consumed, 1);
    }

    #[test]
    fn test_operands_register_and_axis() {
        let ops = Operands::decode(Instruction::Inc, "cyb".chars());
        assert_eq!(ops.reg(0), Reg::C);
        assert_eq!(ops.axis, Axis::Y);
        assert_eq!(ops.consumed, 2);
    }

    #[test]
    fn test_axis_without_register() {
        let ops = Operands::decode(Instruction::Zero, "x".chars());
        assert_eq!(ops.reg(0), Reg::A);
        assert_eq!(ops.axis, Axis::X);
        assert_eq!(ops.consumed, 1);
    }

    #[test]
    fn test_modifiers_ignored_by_operandless_instruction() {
        let ops = Operands::decode(Instruction::Divide, "ab".chars());
        assert_eq!(ops.consumed, 0);
    }
}
