//! Delivery of a finished bundle to stdout or the clipboard.

use std::io::{self, Write};

use crate::domain::errors::RepocatError;
use crate::domain::model::{Bundle, InvocationOptions};
use crate::infra::clipboard::{ClipboardCandidate, select_sink};

/// Where the bundle ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Stdout,
    Clipboard { program: String },
}

/// Send a non-empty bundle to the sink the options ask for.
///
/// Clipboard candidates are only probed in copy mode.
pub fn deliver(
    bundle: &Bundle,
    options: InvocationOptions,
    clipboards: Vec<ClipboardCandidate<'_>>,
    out: &mut dyn Write,
) -> Result<Delivery, RepocatError> {
    if options.copy_to_clipboard {
        let sink = select_sink(clipboards).ok_or(RepocatError::NoClipboard)?;
        let program = sink.name().to_owned();
        sink.copy(bundle.as_bytes())
            .map_err(|err| RepocatError::Clipboard {
                program: program.clone(),
                reason: format!("{err:#}"),
            })?;
        return Ok(Delivery::Clipboard { program });
    }

    match out.write_all(bundle.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => Ok(Delivery::Stdout),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed early");
            Ok(Delivery::Stdout)
        }
        Err(err) => Err(RepocatError::Stdout(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    use anyhow::anyhow;

    use crate::infra::clipboard::ClipboardSink;

    struct Recorder<'a> {
        copied: &'a RefCell<Vec<u8>>,
        fail: bool,
    }

    impl ClipboardSink for Recorder<'_> {
        fn name(&self) -> &str {
            "recorder"
        }

        fn copy(&self, contents: &[u8]) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow!("display unavailable"));
            }
            self.copied.borrow_mut().extend_from_slice(contents);
            Ok(())
        }
    }

    fn bundle() -> Bundle {
        let mut bundle = Bundle::new();
        bundle.push_file(Path::new("a.txt"), b"hello");
        bundle
    }

    #[test]
    fn prints_verbatim_without_extra_newline() {
        let mut out: Vec<u8> = Vec::new();
        let delivery = deliver(&bundle(), InvocationOptions::default(), Vec::new(), &mut out)
            .expect("stdout delivery");
        assert_eq!(delivery, Delivery::Stdout);
        assert_eq!(out, b"--- FILE: ./a.txt ---\nhello\n\n");
    }

    #[test]
    fn print_mode_never_probes_clipboards() {
        let probed = RefCell::new(false);
        let copied = RefCell::new(Vec::new());
        let candidates = vec![ClipboardCandidate::new(
            "recorder",
            || {
                *probed.borrow_mut() = true;
                true
            },
            Recorder {
                copied: &copied,
                fail: false,
            },
        )];

        let mut out: Vec<u8> = Vec::new();
        deliver(&bundle(), InvocationOptions::default(), candidates, &mut out).expect("delivered");
        assert!(!*probed.borrow());
        assert!(copied.borrow().is_empty());
    }

    #[test]
    fn copy_mode_pipes_bundle_into_selected_sink() {
        let copied = RefCell::new(Vec::new());
        let candidates = vec![
            ClipboardCandidate::new(
                "absent",
                || false,
                Recorder {
                    copied: &copied,
                    fail: true,
                },
            ),
            ClipboardCandidate::new(
                "present",
                || true,
                Recorder {
                    copied: &copied,
                    fail: false,
                },
            ),
        ];

        let mut out: Vec<u8> = Vec::new();
        let options = InvocationOptions {
            copy_to_clipboard: true,
        };
        let delivery = deliver(&bundle(), options, candidates, &mut out).expect("copied");

        assert_eq!(
            delivery,
            Delivery::Clipboard {
                program: "recorder".into()
            }
        );
        assert_eq!(*copied.borrow(), b"--- FILE: ./a.txt ---\nhello\n\n");
        assert!(out.is_empty());
    }

    #[test]
    fn copy_mode_without_utility_fails() {
        let mut out: Vec<u8> = Vec::new();
        let options = InvocationOptions {
            copy_to_clipboard: true,
        };
        let err = deliver(&bundle(), options, Vec::new(), &mut out).expect_err("no clipboard");
        assert!(matches!(err, RepocatError::NoClipboard));
        assert!(out.is_empty());
    }

    #[test]
    fn failing_utility_is_reported() {
        let copied = RefCell::new(Vec::new());
        let candidates = vec![ClipboardCandidate::new(
            "broken",
            || true,
            Recorder {
                copied: &copied,
                fail: true,
            },
        )];
        let options = InvocationOptions {
            copy_to_clipboard: true,
        };

        let err = deliver(&bundle(), options, candidates, &mut Vec::<u8>::new()).expect_err("sink fails");
        assert!(
            matches!(err, RepocatError::Clipboard { ref program, ref reason } if program == "recorder" && reason.contains("display unavailable"))
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_pipe_is_not_an_error() {
        let delivery = deliver(&bundle(), InvocationOptions::default(), Vec::new(), &mut ClosedPipe)
            .expect("broken pipe tolerated");
        assert_eq!(delivery, Delivery::Stdout);
    }
}
