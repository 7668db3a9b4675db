//! Interactive scenarios for trying the poller and classifier in a terminal.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;

use keyhit::classifier::{ClassifierConfig, Flush, InputClassifier};
use keyhit::keycode::{self, KeyCode, ESCAPE};
use keyhit::poller::Poller;

/// Pause between polls that flush nothing. A burst ends once a whole tick
/// passes without new bytes.
const TICK: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Print every code as it is read.
    Codes,
    /// Classify bursts with a pair of closures.
    Classify,
    /// Classify bursts with methods of a receiver.
    Receiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub scenario: Scenario,
    pub json: bool,
}

pub fn usage() -> &'static str {
    "usage: keyhit-demo <codes|classify|receiver> [--json]\n\
     \n\
     codes     print each key code as it is read\n\
     classify  group input into keystrokes and text (closure callbacks)\n\
     receiver  same as classify, dispatched to methods of a receiver\n\
     --json    print one JSON object per event\n\
     \n\
     Press ESC to quit."
}

/// `None` means print usage and exit successfully.
pub fn parse_args<I>(args: I) -> Option<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut scenario = None;
    let mut json = false;
    for arg in args {
        match arg.trim_start_matches("--") {
            "codes" => scenario = Some(Scenario::Codes),
            "classify" => scenario = Some(Scenario::Classify),
            "receiver" => scenario = Some(Scenario::Receiver),
            "json" => json = true,
            _ => return None,
        }
    }
    scenario.map(|scenario| Options { scenario, json })
}

pub fn run<P: Poller, W: Write>(
    options: Options,
    poller: P,
    config: ClassifierConfig,
    out: W,
    stop: &AtomicBool,
) -> io::Result<()> {
    tracing::info!(scenario = ?options.scenario, json = options.json, "demo started");
    match options.scenario {
        Scenario::Codes => run_codes(poller, out, stop, options.json),
        Scenario::Classify => run_classify(
            InputClassifier::with_config(poller, config),
            out,
            stop,
            options.json,
        ),
        Scenario::Receiver => run_receiver(
            InputClassifier::with_config(poller, config),
            out,
            stop,
            options.json,
        ),
    }
}

#[derive(Serialize)]
struct CodeLine {
    code: KeyCode,
    names: Vec<&'static str>,
}

#[derive(Serialize)]
struct EventLine<'a> {
    #[serde(flatten)]
    flush: &'a Flush,
    text: String,
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}

fn describe_key(code: KeyCode) -> String {
    let mut label = code.to_string();
    let names = keycode::key_names(code);
    if !names.is_empty() {
        label.push_str(&format!(" [{}]", names.join("/")));
    }
    if keycode::is_printable(code) {
        if let Some(ch) = keycode::as_char(code) {
            label.push_str(&format!(" '{ch}'"));
        }
    }
    label
}

fn write_flush<W: Write>(out: &mut W, flush: &Flush, json: bool) -> io::Result<()> {
    if json {
        return write_json(
            out,
            &EventLine {
                flush,
                text: flush.to_text(),
            },
        );
    }
    match flush {
        Flush::Keystroke { code } => writeln!(out, "Key: {}", describe_key(*code)),
        Flush::Text { codes } => writeln!(
            out,
            "Text: {} ({} bytes)",
            keycode::codes_to_string(codes),
            codes.len()
        ),
    }
}

fn run_codes<P: Poller, W: Write>(
    mut poller: P,
    mut out: W,
    stop: &AtomicBool,
    json: bool,
) -> io::Result<()> {
    while !stop.load(Ordering::Relaxed) {
        let count = poller.key_hit();
        if count == 0 {
            std::thread::sleep(TICK);
            continue;
        }

        for _ in 0..count {
            let code = poller.read_key();
            if keycode::is_end_of_stream(code) {
                return Ok(());
            }
            if json {
                write_json(
                    &mut out,
                    &CodeLine {
                        code,
                        names: keycode::key_names(code),
                    },
                )?;
            } else {
                write!(out, "Read Code: {} ", describe_key(code))?;
            }
            if code == ESCAPE {
                writeln!(out)?;
                return out.flush();
            }
        }
        if !json {
            writeln!(out)?;
        }
        out.flush()?;
    }
    Ok(())
}

fn run_classify<P: Poller, W: Write>(
    mut classifier: InputClassifier<P>,
    out: W,
    stop: &AtomicBool,
    json: bool,
) -> io::Result<()> {
    let out = RefCell::new(out);
    let quit = Cell::new(false);
    let failed: RefCell<Option<io::Error>> = RefCell::new(None);
    let record = |result: io::Result<()>| {
        if let Err(err) = result {
            failed.borrow_mut().get_or_insert(err);
        }
    };

    while !stop.load(Ordering::Relaxed) && !quit.get() {
        let flushed = classifier.pump(
            |code| {
                if code == ESCAPE {
                    quit.set(true);
                }
                let flush = Flush::Keystroke { code };
                record(write_flush(&mut *out.borrow_mut(), &flush, json));
            },
            |codes| {
                let flush = Flush::Text {
                    codes: codes.to_vec(),
                };
                record(write_flush(&mut *out.borrow_mut(), &flush, json));
            },
        );

        if let Some(err) = failed.borrow_mut().take() {
            return Err(err);
        }
        if flushed.is_some() {
            out.borrow_mut().flush()?;
        } else {
            std::thread::sleep(TICK);
        }
    }
    Ok(())
}

/// Receives classified input through its own methods.
struct DropZone<W> {
    out: W,
    json: bool,
    keys: usize,
    paths: Vec<String>,
    quit: bool,
    first_err: Option<io::Error>,
}

impl<W: Write> DropZone<W> {
    fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            keys: 0,
            paths: Vec::new(),
            quit: false,
            first_err: None,
        }
    }

    fn on_key(&mut self, code: KeyCode) {
        self.keys += 1;
        if code == ESCAPE {
            self.quit = true;
        }
        let result = write_flush(&mut self.out, &Flush::Keystroke { code }, self.json);
        self.keep_error(result);
    }

    fn on_path(&mut self, codes: &[KeyCode]) {
        let path = keycode::codes_to_string(codes);
        let flush = Flush::Text {
            codes: codes.to_vec(),
        };
        let result = write_flush(&mut self.out, &flush, self.json);
        self.keep_error(result);
        self.paths.push(path);
    }

    fn keep_error(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.first_err.get_or_insert(err);
        }
    }

    fn summary(&mut self) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(
            self.out,
            "{} keystrokes, {} paths dropped",
            self.keys,
            self.paths.len()
        )?;
        for path in &self.paths {
            writeln!(self.out, "  {path}")?;
        }
        self.out.flush()
    }
}

fn run_receiver<P: Poller, W: Write>(
    mut classifier: InputClassifier<P>,
    out: W,
    stop: &AtomicBool,
    json: bool,
) -> io::Result<()> {
    let mut zone = DropZone::new(out, json);

    while !stop.load(Ordering::Relaxed) && !zone.quit {
        let flushed = classifier.pump_bound(&mut zone, DropZone::on_key, DropZone::on_path);
        if let Some(err) = zone.first_err.take() {
            return Err(err);
        }
        if flushed.is_some() {
            zone.out.flush()?;
        } else {
            std::thread::sleep(TICK);
        }
    }
    zone.summary()
}

#[cfg(test)]
#[path = "../tests/unit/demo.rs"]
mod tests;
