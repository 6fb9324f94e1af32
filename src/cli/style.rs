//! Terminal styling for submission output
//!
//! Colors are applied only when the target stream supports them
//! (`owo-colors` honours `NO_COLOR`, `CLICOLOR` and TTY detection).
//!
//! | Method      | Look   | Used for                         |
//! |-------------|--------|----------------------------------|
//! | `.branch()` | Cyan   | branch and remote ref names      |
//! | `.commit()` | Yellow | abbreviated commit ids           |
//! | `.phase()`  | Bold   | phase headers, mainline name     |
//! | `.error()`  | Red    | the `error:` prefix              |
//! | `.warn()`   | Yellow | the `warning:` prefix            |
//! | `.muted()`  | Dim    | URLs                             |

use std::fmt::{self, Display};

pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};

const BRANCH: Style = Style::new().cyan();
const COMMIT: Style = Style::new().yellow();
const PHASE: Style = Style::new().bold();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red().bold();
const WARN: Style = Style::new().yellow().bold();
const MUTED: Style = Style::new().dimmed();

/// Length of abbreviated commit ids
const SHORT_ID_LEN: usize = 8;

/// A value rendered with a style when `stream` supports color
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style, stream: Stream) -> Self {
        Self {
            value,
            style,
            stream,
        }
    }

    /// Detect color support on stderr instead of stdout
    #[must_use]
    pub const fn for_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

/// Styling for anything printable
pub trait Stylize: Display {
    /// Branch or ref name
    fn branch(&self) -> Styled<&Self> {
        Styled::new(self, BRANCH, Stream::Stdout)
    }

    /// Commit id
    fn commit(&self) -> Styled<&Self> {
        Styled::new(self, COMMIT, Stream::Stdout)
    }

    /// Heading text
    fn phase(&self) -> Styled<&Self> {
        Styled::new(self, PHASE, Stream::Stdout)
    }

    /// Error prefix, for stderr
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, ERROR, Stream::Stderr)
    }

    /// Warning prefix, for stderr
    fn warn(&self) -> Styled<&Self> {
        Styled::new(self, WARN, Stream::Stderr)
    }

    /// Secondary text
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, MUTED, Stream::Stdout)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Abbreviate a commit id for display
pub fn short_id(commit: &str) -> &str {
    commit.get(..SHORT_ID_LEN).unwrap_or(commit)
}

/// Green check mark
pub const fn check() -> Styled<&'static str> {
    Styled::new("✓", SUCCESS, Stream::Stdout)
}

/// Red cross, for stderr
pub const fn cross() -> Styled<&'static str> {
    Styled::new("✗", ERROR, Stream::Stderr)
}

/// Phase marker
pub const fn arrow() -> Styled<&'static str> {
    Styled::new("→", BRANCH, Stream::Stdout)
}

/// `url` as an OSC 8 link where the terminal supports it, else plain text
pub fn hyperlink_url(stream: Stream, url: &str) -> String {
    let target = match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    };

    if supports_hyperlinks::on(target) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}
