use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Reads a value of type `T` from stdin after printing a message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Prompt<'a> {
    msg: &'a str,
}

impl<'a> Prompt<'a> {
    #[inline]
    pub fn new(msg: &'a str) -> Self {
        Self { msg }
    }

    /// Reads a single line. Returns [`io::ErrorKind::UnexpectedEof`] once stdin is closed.
    pub fn read_line(&self) -> io::Result<String> {
        {
            let mut writer = io::stdout();
            writer.write_all(self.msg.as_bytes())?;
            writer.write_all(b": ")?;
            writer.flush()?;
        }

        let mut string = String::new();
        if io::stdin().lock().read_line(&mut string)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        let len = string.trim_end_matches(&['\r', '\n'][..]).len();
        string.truncate(len);
        Ok(string)
    }

    /// Reads until a valid value is input.
    pub fn read_valid<T>(&self) -> io::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            match self.read_line()?.parse() {
                Ok(val) => return Ok(val),
                Err(err) => {
                    println!("Failed to parse input: {}", err)
                }
            }
        }
    }
}
