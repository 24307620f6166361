#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Bare,
    InSingleQuote,
    InDoubleQuote,
    BareEscape,
    DoubleQuoteEscape,
}

// Characters a backslash may escape inside double quotes.
const DOUBLE_QUOTE_ESCAPABLE: &[char] = &['"', '\\', '`'];

struct Tokenizer {
    state: State,
    tokens: Vec<String>,
    current: String,
    // Set once anything (even an empty quoted region) contributes to the current token.
    in_token: bool,
}

impl Tokenizer {
    fn new() -> Self {
        return Self {
            state: State::Bare,
            tokens: Vec::new(),
            current: String::new(),
            in_token: false,
        };
    }

    fn feed(&mut self, ch: char) {
        match self.state {
            State::Bare => self.bare(ch),
            State::InSingleQuote => match ch {
                '\'' => self.state = State::Bare,
                ch => self.current.push(ch),
            },
            State::InDoubleQuote => match ch {
                '"' => self.state = State::Bare,
                '\\' => self.state = State::DoubleQuoteEscape,
                ch => self.current.push(ch),
            },
            State::BareEscape => {
                self.in_token = true;
                self.current.push(ch);
                self.state = State::Bare;
            }
            State::DoubleQuoteEscape => {
                if !DOUBLE_QUOTE_ESCAPABLE.contains(&ch) {
                    self.current.push('\\');
                }
                self.current.push(ch);
                self.state = State::InDoubleQuote;
            }
        }
    }

    fn bare(&mut self, ch: char) {
        match ch {
            ' ' | '\t' => self.finish_token(),
            '\'' => {
                self.in_token = true;
                self.state = State::InSingleQuote;
            }
            '"' => {
                self.in_token = true;
                self.state = State::InDoubleQuote;
            }
            '\\' => self.state = State::BareEscape,
            ch => {
                self.in_token = true;
                self.current.push(ch);
            }
        }
    }

    fn finish_token(&mut self) {
        if self.in_token {
            self.tokens.push(std::mem::take(&mut self.current));
            self.in_token = false;
        }
    }

    fn finish(mut self) -> Vec<String> {
        match self.state {
            // A dangling backslash escapes nothing.
            State::BareEscape => {}
            // Escape at end of line inside double quotes keeps its backslash.
            State::DoubleQuoteEscape => self.current.push('\\'),
            // Unterminated quotes close implicitly at end of line.
            State::Bare | State::InSingleQuote | State::InDoubleQuote => {}
        }
        self.finish_token();

        return self.tokens;
    }
}

/// Splits a raw input line into arguments using POSIX-like quoting rules.
///
/// Never fails: an unterminated quote runs to the end of the line and a
/// trailing lone backslash is dropped.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokenizer = Tokenizer::new();
    for ch in line.chars() {
        tokenizer.feed(ch);
    }

    let tokens = tokenizer.finish();
    log::trace!("Tokenized {:?} into {:?}", line, tokens);

    return tokens;
}
