use std::io::{self, Write};

use detector_core::{JobId, PanelPhase, PanelView};
use detector_engine::Ack;

/// Where the panel lives. The coordinator drives it from effects and view models.
pub trait PanelSurface {
    fn mount(&mut self, job_id: &JobId) -> io::Result<()>;
    fn unmount(&mut self) -> io::Result<()>;
    fn render(&mut self, view: &PanelView) -> io::Result<()>;
    fn open_tab(&mut self, url: &str) -> io::Result<()>;
    fn acknowledge(&mut self, ack: &Ack) -> io::Result<()>;
}

/// Reveal progress is reported in steps of this many percent.
const PERCENT_STEP: u8 = 25;

/// Line-oriented panel for terminals and pipes.
pub struct TerminalSurface<W: Write> {
    out: W,
    last_line: Option<String>,
    last_phase: PanelPhase,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_line: None,
            last_phase: PanelPhase::Unmounted,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: String) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        self.last_line = Some(line);
        Ok(())
    }
}

impl<W: Write> PanelSurface for TerminalSurface<W> {
    fn mount(&mut self, job_id: &JobId) -> io::Result<()> {
        self.write_line(format!("panel mounted for {job_id}"))
    }

    fn unmount(&mut self) -> io::Result<()> {
        self.last_phase = PanelPhase::Unmounted;
        self.write_line("panel removed".to_string())
    }

    fn render(&mut self, view: &PanelView) -> io::Result<()> {
        let job = view.job_id.as_ref().map_or("-", JobId::as_str);
        let loading = if view.show_spinner && view.phase != PanelPhase::Scanning {
            " (loading)"
        } else {
            ""
        };
        let line = match view.phase {
            PanelPhase::Unmounted => return Ok(()),
            PanelPhase::Scanning => format!("[scanning] {job}"),
            PanelPhase::Streaming => {
                let percent = view.reveal_percent.unwrap_or(0) / PERCENT_STEP * PERCENT_STEP;
                format!("[streaming {percent}%] {job}{loading}")
            }
            PanelPhase::Ready => format!(
                "[ready] {job}: {} words, continue {}{}{loading}",
                view.word_count,
                if view.continue_enabled {
                    "enabled"
                } else {
                    "disabled"
                },
                if view.submitting { ", submitting" } else { "" },
            ),
        };

        let entered_ready = view.phase == PanelPhase::Ready && self.last_phase != PanelPhase::Ready;
        self.last_phase = view.phase;
        if self.last_line.as_deref() != Some(line.as_str()) {
            self.write_line(line)?;
        }
        if entered_ready {
            writeln!(self.out, "  | {}", view.visible_text)?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn open_tab(&mut self, url: &str) -> io::Result<()> {
        self.write_line(format!("open tab: {url}"))
    }

    fn acknowledge(&mut self, ack: &Ack) -> io::Result<()> {
        self.write_line(ack.to_json())
    }
}
