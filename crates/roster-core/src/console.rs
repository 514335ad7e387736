//! The console seam used by the interactive entry operations.

use std::io;

/// Line-oriented user interaction.
pub trait Console {
    /// Show `prompt` and read one line without its terminator.
    ///
    /// `Ok(None)` means the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Print one line of output.
    fn say(&mut self, line: &str);
}

/// Input equal to `sentinel` ignoring ASCII case.
pub(crate) fn is_sentinel(input: &str, sentinel: &str) -> bool {
    input.eq_ignore_ascii_case(sentinel)
}

/// A section banner.
pub(crate) fn banner(console: &mut impl Console, title: &str, rule: char) {
    let line: String = std::iter::repeat_n(rule, 60).collect();
    console.say("");
    console.say(&line);
    console.say(&format!("{title:^60}"));
    console.say(&line);
}
