//! The fixed instruction alphabet. Decoding into instructions lives in
//! `mycora_core::isa`; here a symbol is only a character with a stable code.

/// Symbol of a never-written cell.
pub const EMPTY_SYMBOL: char = '.';

/// Every symbol an arena cell may hold, in code order.
pub const ALPHABET: [char; 29] = [
    '.', ':', // templates
    'a', 'b', 'c', 'd', 'x', 'y', // modifiers
    '^', 'v', '>', '<', 'J', // movement
    '?', '=', // conditionals
    '0', '1', '+', '-', '~', // arithmetic
    'S', 'P', // stack
    'O', '&', 'Q', // sensing
    'W', 'C', '@', '$', // reproduction
];

/// Position of `symbol` in [`ALPHABET`], or `None` for foreign characters.
#[must_use]
pub fn symbol_code(symbol: char) -> Option<usize> {
    ALPHABET.iter().position(|&s| s == symbol)
}

/// Symbol with the given code, folded into the alphabet.
#[must_use]
pub fn symbol_at(code: usize) -> char {
    ALPHABET[code % ALPHABET.len()]
}

#[must_use]
pub fn is_valid_symbol(symbol: char) -> bool {
    symbol_code(symbol).is_some()
}
