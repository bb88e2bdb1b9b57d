//! Bridge to the external spectrum analyzer process.
//!
//! The analyzer writes binary spectrum frames into a named pipe. The
//! bridge owns the child process and the pipe's read end, drains the pipe
//! once per tick and keeps the newest complete frame for the programs to
//! read. It is itself a program so the usual acquire/release counting
//! decides when the analyzer runs; several consumers share one process.

mod fifo;
mod frame;

use std::cell::RefCell;
use std::io;
use std::os::fd::OwnedFd;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::rc::Rc;

pub use fifo::{read_some, ReadOutcome};
pub use frame::{aggregate_bins, FrameAssembler};

use crate::program::{
    DeviceHooks, Lifecycle, LightProgram, ProgramError, Tick, PROGRAM_NAME_AUDIO,
};
use crate::settings::AudioSettings;

/// Single shared bridge handed to every audio-driven program.
pub type SharedAudioBridge = Rc<RefCell<AudioBridge>>;

/// Owns the analyzer process and its output pipe.
pub struct AudioBridge {
    settings: AudioSettings,
    state: Lifecycle,
    reader: Option<OwnedFd>,
    child: Option<Child>,
    assembler: FrameAssembler,
    read_buf: Vec<u8>,
    close_logged: bool,
}

impl AudioBridge {
    pub fn new(settings: AudioSettings) -> Self {
        let bars = settings.bars;
        Self {
            settings,
            state: Lifecycle::default(),
            reader: None,
            child: None,
            assembler: FrameAssembler::new(bars),
            read_buf: vec![0; bars],
            close_logged: false,
        }
    }

    pub fn shared(settings: AudioSettings) -> SharedAudioBridge {
        Rc::new(RefCell::new(Self::new(settings)))
    }

    /// The newest complete spectrum frame, all zeros before the first one.
    pub fn frame(&self) -> &[f32] {
        self.assembler.frame()
    }

    fn pipe_error(&self, source: io::Error) -> ProgramError {
        ProgramError::Pipe {
            path: self.settings.fifo_path.clone(),
            source,
        }
    }

    fn remove_fifo(path: &Path) {
        if let Err(err) = std::fs::remove_file(path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), %err, "could not remove fifo");
            }
        }
    }
}

impl LightProgram for AudioBridge {
    fn name(&self) -> &'static str {
        PROGRAM_NAME_AUDIO
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.state
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.state
    }

    fn start(&mut self, hooks: &mut dyn DeviceHooks) -> Result<(), ProgramError> {
        let path = self.settings.fifo_path.clone();

        self.assembler.reset();
        self.close_logged = false;
        fifo::create(&path).map_err(|err| self.pipe_error(err))?;

        // The read end must exist before the write end is opened, the
        // latter blocks until a reader shows up.
        let reader = fifo::open_read_nonblocking(&path).map_err(|err| self.pipe_error(err))?;

        hooks.set_capture_rate(self.settings.capture_rate);

        let writer = match fifo::open_write(&path) {
            Ok(writer) => writer,
            Err(err) => {
                Self::remove_fifo(&path);
                return Err(self.pipe_error(err));
            }
        };

        let child = Command::new(&self.settings.command)
            .args(&self.settings.args)
            .stdout(Stdio::from(writer))
            .spawn();
        let child = match child {
            Ok(child) => child,
            Err(err) => {
                Self::remove_fifo(&path);
                return Err(ProgramError::Spawn(err));
            }
        };

        tracing::info!(command = %self.settings.command, "spectrum analyzer started");
        self.reader = Some(reader);
        self.child = Some(child);
        Ok(())
    }

    /// Drain the pipe. Reading until would-block means the frame kept for
    /// this tick is always the newest one the analyzer has produced.
    fn compute(&mut self, _tick: &mut Tick<'_>) {
        let Some(reader) = &self.reader else {
            return;
        };
        loop {
            let missing = self.assembler.missing();
            match fifo::read_some(reader, &mut self.read_buf[..missing]) {
                Ok(ReadOutcome::Data(n)) => self.assembler.extend(&self.read_buf[..n]),
                Ok(ReadOutcome::WouldBlock) => break,
                Ok(ReadOutcome::Closed) => {
                    // The pipe stays closed until a restart, one line is
                    // enough.
                    if !self.close_logged {
                        tracing::warn!("spectrum analyzer closed its pipe");
                        self.close_logged = true;
                    }
                    break;
                }
                Err(err) => {
                    tracing::warn!(%err, "spectrum read failed");
                    break;
                }
            }
        }
    }

    fn stop(&mut self, _hooks: &mut dyn DeviceHooks) {
        self.reader = None;
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                tracing::debug!(%err, "analyzer already gone");
            }
            if let Err(err) = child.wait() {
                tracing::debug!(%err, "could not reap analyzer");
            }
        }
        Self::remove_fifo(&self.settings.fifo_path);
        self.assembler.reset();
    }
}
