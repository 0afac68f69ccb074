//! Vi digraph table (`Ctrl-K a:` style input): a two-character mnemonic
//! maps to a single Unicode character.
//!
//! This is a representative subset of the ~1,300-entry RFC 1345 table —
//! the common Latin-1 accented letters, a handful of currency and
//! punctuation symbols, and the Greek alphabet — not the full table. The
//! lookup mechanism is complete; only the data is trimmed. Extending
//! coverage is a matter of adding rows to [`DIGRAPHS`].
use std::sync::OnceLock;
use std::collections::HashMap;

/// `(mnemonic, result)` pairs, e.g. `(['a', ':'], 'ä')`.
const DIGRAPHS: &[([char; 2], char)] = &[
    (['a', ':'], 'ä'), (['a', '!'], 'à'), (['a', '\''], 'á'), (['a', '>'], 'â'),
    (['a', '?'], 'ã'), (['a', 'a'], 'å'), (['a', 'e'], 'æ'),
    (['e', ':'], 'ë'), (['e', '!'], 'è'), (['e', '\''], 'é'), (['e', '>'], 'ê'),
    (['i', ':'], 'ï'), (['i', '!'], 'ì'), (['i', '\''], 'í'), (['i', '>'], 'î'),
    (['o', ':'], 'ö'), (['o', '!'], 'ò'), (['o', '\''], 'ó'), (['o', '>'], 'ô'),
    (['o', '?'], 'õ'), (['o', '/'], 'ø'),
    (['u', ':'], 'ü'), (['u', '!'], 'ù'), (['u', '\''], 'ú'), (['u', '>'], 'û'),
    (['n', '?'], 'ñ'), (['c', ','], 'ç'), (['y', '\''], 'ý'), (['y', ':'], 'ÿ'),
    (['A', ':'], 'Ä'), (['A', '!'], 'À'), (['A', '\''], 'Á'), (['A', '>'], 'Â'),
    (['A', 'A'], 'Å'), (['A', 'E'], 'Æ'),
    (['E', ':'], 'Ë'), (['E', '!'], 'È'), (['E', '\''], 'É'), (['E', '>'], 'Ê'),
    (['I', ':'], 'Ï'), (['I', '!'], 'Ì'), (['I', '\''], 'Í'), (['I', '>'], 'Î'),
    (['O', ':'], 'Ö'), (['O', '!'], 'Ò'), (['O', '\''], 'Ó'), (['O', '/'], 'Ø'),
    (['U', ':'], 'Ü'), (['U', '!'], 'Ù'), (['U', '\''], 'Ú'), (['U', '>'], 'Û'),
    (['N', '?'], 'Ñ'), (['C', ','], 'Ç'),
    (['s', 's'], 'ß'), (['d', '/'], 'đ'), (['D', '/'], 'Đ'), (['t', 'h'], 'þ'),
    (['T', 'H'], 'Þ'),
    (['S', 's'], '§'), (['P', 'd'], '£'), (['D', 'O'], '$'), (['C', 'e'], '¢'),
    (['Y', '-'], '¥'), (['E', 'u'], '€'), (['C', 'u'], '¤'),
    (['C', 'o'], '©'), (['R', 'g'], '®'), (['T', 'M'], '™'), (['D', 'G'], '°'),
    (['P', 'I'], '¶'), (['S', 'E'], '§'),
    (['-', '1'], '‐'), (['-', 'N'], '–'), (['-', 'M'], '—'), (['.', '.'], '‥'),
    (['.', '3'], '…'),
    (['\'', '6'], '‘'), (['\'', '9'], '’'), (['"', '6'], '“'), (['"', '9'], '”'),
    (['<', '<'], '«'), (['>', '>'], '»'),
    (['1', '2'], '½'), (['1', '4'], '¼'), (['3', '4'], '¾'),
    (['+', '-'], '±'), (['D', 'I'], '÷'), (['*', 'X'], '×'), (['R', 'T'], '√'),
    (['0', '0'], '∞'), (['?', '='], '≈'), (['!', '='], '≠'), (['=', '<'], '≤'),
    (['>', '='], '≥'),
    (['-', '>'], '→'), (['<', '-'], '←'), (['-', '!'], '↑'), (['-', 'v'], '↓'),
    (['a', '*'], 'α'), (['b', '*'], 'β'), (['g', '*'], 'γ'), (['d', '*'], 'δ'),
    (['e', '*'], 'ε'), (['z', '*'], 'ζ'), (['y', '*'], 'η'), (['h', '*'], 'θ'),
    (['i', '*'], 'ι'), (['k', '*'], 'κ'), (['l', '*'], 'λ'), (['m', '*'], 'μ'),
    (['n', '*'], 'ν'), (['c', '*'], 'ξ'), (['o', '*'], 'ο'), (['p', '*'], 'π'),
    (['r', '*'], 'ρ'), (['s', '*'], 'σ'), (['t', '*'], 'τ'), (['u', '*'], 'υ'),
    (['f', '*'], 'φ'), (['x', '*'], 'χ'), (['q', '*'], 'ψ'), (['w', '*'], 'ω'),
    (['A', '*'], 'Α'), (['B', '*'], 'Β'), (['G', '*'], 'Γ'), (['D', '*'], 'Δ'),
    (['E', '*'], 'Ε'), (['Z', '*'], 'Ζ'), (['Y', '*'], 'Η'), (['H', '*'], 'Θ'),
    (['I', '*'], 'Ι'), (['K', '*'], 'Κ'), (['L', '*'], 'Λ'), (['M', '*'], 'Μ'),
    (['N', '*'], 'Ν'), (['C', '*'], 'Ξ'), (['O', '*'], 'Ο'), (['P', '*'], 'Π'),
    (['R', '*'], 'Ρ'), (['S', '*'], 'Σ'), (['T', '*'], 'Τ'), (['U', '*'], 'Υ'),
    (['F', '*'], 'Φ'), (['X', '*'], 'Χ'), (['Q', '*'], 'Ψ'), (['W', '*'], 'Ω'),
    (['O', 'K'], '✓'), (['X', 'X'], '✗'), (['S', 'U'], '☺'),
    (['N', 'S'], ' '), (['S', 'P'], ' '),
];

fn table() -> &'static HashMap<(char, char), char> {
    static TABLE: OnceLock<HashMap<(char, char), char>> = OnceLock::new();
    TABLE.get_or_init(|| {
        DIGRAPHS
            .iter()
            .map(|(mnemonic, result)| ((mnemonic[0], mnemonic[1]), *result))
            .collect()
    })
}

/// Look up a two-character digraph mnemonic, returning the character it
/// produces, or `None` if this mnemonic is not in the (partial) table.
pub fn lookup(first: char, second: char) -> Option<char> {
    table().get(&(first, second)).copied()
}

/// Number of mnemonics currently registered.
pub fn len() -> usize {
    DIGRAPHS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_digraph() {
        assert_eq!(lookup('a', ':'), Some('ä'));
        assert_eq!(lookup('s', 's'), Some('ß'));
    }

    #[test]
    fn unknown_digraph_is_none() {
        assert_eq!(lookup('z', 'z'), None);
    }

    #[test]
    fn table_is_nonempty_and_reasonably_sized() {
        assert!(len() > 100);
    }
}
