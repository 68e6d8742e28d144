//! Reconstruct natural spacing from whitespace-tokenized English text.
//!
//! The aligned Newsela dumps store Moses-tokenized sentences ("The cat sat .");
//! downstream experiments want natural text ("The cat sat."). Tokens are
//! joined with single spaces and the space is then dropped around punctuation,
//! brackets, clitics and paired quotes. The mapping is a pure function of the
//! input, so repeated imports stay byte-identical.

/// Join whitespace-separated tokens back into naturally spaced text.
/// Text that is already natural passes through unchanged apart from
/// whitespace normalization.
pub fn detokenize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // True while the previous token suppresses the space that would normally
    // precede the current one. Starts true: no space before the first token.
    let mut glue_next = true;
    let mut open_quote = false;

    for token in text.split_whitespace() {
        let (attach_left, attach_right) = if token == "\"" {
            // Straight double quotes alternate: opening glues forward,
            // closing glues backward.
            let closing = open_quote;
            open_quote = !open_quote;
            (closing, !closing)
        } else {
            (attaches_left(token), attaches_right(token))
        };
        if !glue_next && !attach_left {
            out.push(' ');
        }
        out.push_str(token);
        glue_next = attach_right;
    }
    out
}

/// Closing punctuation and clitics take the place of the space before them.
fn attaches_left(token: &str) -> bool {
    matches!(
        token,
        "." | "," | "!" | "?" | ":" | ";" | "%" | ")" | "]" | "}" | "..." | "''" | "'"
    ) || is_clitic(token)
}

/// Opening brackets and currency signs drop the space after them.
fn attaches_right(token: &str) -> bool {
    matches!(token, "(" | "[" | "{" | "$" | "£" | "€" | "``")
}

/// English contractions split off by Moses tokenization ("do n't", "it 's").
fn is_clitic(token: &str) -> bool {
    const CLITICS: [&str; 8] = ["'s", "'t", "'re", "'ve", "'ll", "'d", "'m", "n't"];
    CLITICS.iter().any(|c| token.eq_ignore_ascii_case(c))
}
