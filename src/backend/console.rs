// src/backend/console.rs

//! Console backend. Owns the controlling terminal through stdin/stdout:
//! raw input mode, the alternate screen, focus reporting, and truecolor
//! SGR output. All drawing is buffered into stdout and made visible by
//! `present`.

use crate::backend::{
    BackendEvent, Driver, KeySymbol, Modifiers, DEFAULT_HEIGHT_CELLS, DEFAULT_WIDTH_CELLS,
};
use crate::color::Rgb;
use crate::render::Cell;

use anyhow::{Context, Result};
use libc::{winsize, STDIN_FILENO, TIOCGWINSZ};
use std::io::{self, stdin, stdout, Read, Write};
use std::mem;
use std::os::unix::io::RawFd;
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW, VMIN, VTIME};

use log::{debug, error, info, trace, warn};

const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";
const LEAVE_ALT_SCREEN: &str = "\x1b[?1049l";
const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";
const FOCUS_REPORT_ON: &str = "\x1b[?1004h";
const FOCUS_REPORT_OFF: &str = "\x1b[?1004l";
const AUTOWRAP_OFF: &str = "\x1b[?7l";
const AUTOWRAP_ON: &str = "\x1b[?7h";
const CLEAR_SCREEN_AND_HOME: &str = "\x1b[2J\x1b[H";
const SGR_RESET: &str = "\x1b[0m";

pub struct ConsoleDriver {
    original_termios: Option<Termios>,
    input_buffer: [u8; 128],
    cleaned_up: bool,
}

impl Driver for ConsoleDriver {
    fn new() -> Result<Self> {
        info!("Creating new ConsoleDriver.");
        let original_termios = match Termios::from_fd(STDIN_FILENO) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(
                    "Failed to get initial termios: {}. Proceeding without raw mode.",
                    e
                );
                None
            }
        };

        if let Some(ref ots) = original_termios {
            let mut raw_termios = *ots;
            raw_termios.c_lflag &= !(ECHO | ICANON | ISIG);
            raw_termios.c_iflag &=
                !(libc::IXON | libc::IXOFF | libc::ICRNL | libc::INLCR | libc::IGNCR);
            raw_termios.c_oflag &= !libc::OPOST;
            raw_termios.c_cc[VMIN] = 0;
            raw_termios.c_cc[VTIME] = 0;
            tcsetattr(STDIN_FILENO, TCSANOW, &raw_termios)
                .context("ConsoleDriver: Failed to set raw terminal attributes")?;
            debug!("ConsoleDriver: Terminal set to raw mode.");
        }

        print!(
            "{}{}{}{}",
            ENTER_ALT_SCREEN, CURSOR_HIDE, AUTOWRAP_OFF, FOCUS_REPORT_ON
        );
        stdout()
            .flush()
            .context("ConsoleDriver: Failed to flush stdout during setup")?;

        let (initial_width, initial_height) = query_terminal_size(STDIN_FILENO);
        info!(
            "ConsoleDriver: Initial terminal size: {}x{} cells.",
            initial_width, initial_height
        );

        Ok(ConsoleDriver {
            original_termios,
            input_buffer: [0u8; 128],
            cleaned_up: false,
        })
    }

    fn get_event_fd(&self) -> Option<RawFd> {
        Some(STDIN_FILENO)
    }

    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        match stdin().read(&mut self.input_buffer) {
            Ok(0) => {
                info!("ConsoleDriver: EOF on stdin. Requesting close.");
                Ok(vec![BackendEvent::CloseRequested])
            }
            Ok(bytes_read) => {
                trace!("ConsoleDriver: Read {} bytes from stdin.", bytes_read);
                Ok(parse_input(&self.input_buffer[..bytes_read]))
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                trace!("ConsoleDriver: stdin read WouldBlock.");
                Ok(Vec::new())
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {
                trace!("ConsoleDriver: stdin read Interrupted.");
                Ok(Vec::new())
            }
            Err(e) => Err(e).context("ConsoleDriver: Error reading from stdin"),
        }
    }

    fn dimensions(&self) -> (u16, u16) {
        query_terminal_size(STDIN_FILENO)
    }

    fn clear(&mut self) -> Result<()> {
        print!("{}{}", SGR_RESET, CLEAR_SCREEN_AND_HOME);
        Ok(())
    }

    fn draw_cells(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        if cells.is_empty() {
            return Ok(());
        }
        let mut cmd = format_cursor_position(y + 1, x + 1);
        // Neighboring cells often share colors; only emit SGR on change.
        let mut last_colors: Option<(Rgb, Rgb)> = None;
        for cell in cells {
            if last_colors != Some((cell.fg, cell.bg)) {
                cmd.push_str(&format_sgr_colors(cell.fg, cell.bg));
                last_colors = Some((cell.fg, cell.bg));
            }
            cmd.push(cell.glyph);
        }
        cmd.push_str(SGR_RESET);
        print!("{}", cmd);
        trace!(
            "ConsoleDriver: draw_cells at ({},{}) run of {} cmd: {:?}",
            x,
            y,
            cells.len(),
            cmd
        );
        Ok(())
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgb, bg: Rgb) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut cmd = format_cursor_position(y + 1, x + 1);
        cmd.push_str(&format_sgr_colors(fg, bg));
        cmd.push_str(text);
        cmd.push_str(SGR_RESET);
        print!("{}", cmd);
        trace!(
            "ConsoleDriver: draw_text at ({},{}) text {:?}",
            x,
            y,
            text
        );
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        stdout()
            .flush()
            .context("ConsoleDriver: Failed to flush stdout during present")
    }

    fn set_title(&mut self, title: &str) {
        print!("\x1b]2;{}\x07", title);
        trace!("ConsoleDriver: set_title to {:?}", title);
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;
        info!("ConsoleDriver: Cleaning up...");
        print!(
            "{}{}{}{}{}",
            SGR_RESET, FOCUS_REPORT_OFF, AUTOWRAP_ON, CURSOR_SHOW, LEAVE_ALT_SCREEN
        );
        stdout()
            .flush()
            .context("ConsoleDriver: Failed to flush stdout during cleanup")?;
        if let Some(original_termios) = self.original_termios.take() {
            debug!("ConsoleDriver: Restoring original terminal attributes.");
            tcsetattr(STDIN_FILENO, TCSANOW, &original_termios)
                .context("ConsoleDriver: Failed to restore original terminal attributes")?;
        } else {
            warn!("ConsoleDriver: No original termios to restore.");
        }
        info!("ConsoleDriver: Cleanup complete.");
        Ok(())
    }
}

impl Drop for ConsoleDriver {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("ConsoleDriver: Error during cleanup in drop: {}", e);
        }
    }
}

/// Translates a burst of raw stdin bytes into key and focus events.
/// Unrecognized bytes and sequences are skipped so one exotic key cannot
/// desynchronize the rest of the burst.
fn parse_input(bytes: &[u8]) -> Vec<BackendEvent> {
    let mut events = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => {
                let (event, consumed) = parse_escape(&bytes[i..]);
                if let Some(event) = event {
                    events.push(event);
                }
                i += consumed;
            }
            byte => {
                if let Some(event) = parse_plain_byte(byte) {
                    events.push(event);
                } else {
                    trace!("ConsoleDriver: Skipping unhandled input byte {:#04x}.", byte);
                }
                i += 1;
            }
        }
    }
    events
}

fn parse_plain_byte(byte: u8) -> Option<BackendEvent> {
    let (symbol, modifiers) = match byte {
        b'\t' => (KeySymbol::Tab, Modifiers::empty()),
        b'\r' | b'\n' => (KeySymbol::Enter, Modifiers::empty()),
        0x7f | 0x08 => (KeySymbol::Backspace, Modifiers::empty()),
        // Remaining C0 controls arrive as Ctrl+letter.
        c @ 0x01..=0x1a => (
            KeySymbol::Char((b'a' + c - 1) as char),
            Modifiers::CONTROL,
        ),
        c @ 0x20..=0x7e => (KeySymbol::Char(c as char), Modifiers::empty()),
        _ => return None,
    };
    Some(BackendEvent::Key { symbol, modifiers })
}

/// Decodes one escape sequence at the start of `bytes` (which begins with
/// ESC). Returns the translated event, if any, and how many bytes the
/// sequence consumed.
fn parse_escape(bytes: &[u8]) -> (Option<BackendEvent>, usize) {
    if bytes.len() == 1 {
        // A lone ESC at the end of a read burst is the Escape key itself.
        return (
            Some(BackendEvent::Key {
                symbol: KeySymbol::Escape,
                modifiers: Modifiers::empty(),
            }),
            1,
        );
    }

    if bytes[1] == b'[' {
        // CSI: parameter and intermediate bytes, then one final byte in
        // 0x40..=0x7e.
        let Some(final_at) = bytes[2..].iter().position(|b| (0x40..=0x7e).contains(b)) else {
            trace!("ConsoleDriver: Incomplete CSI sequence, dropping {} bytes.", bytes.len());
            return (None, bytes.len());
        };
        let consumed = 2 + final_at + 1;
        let event = match bytes[2 + final_at] {
            b'A' => key_event(KeySymbol::Up, Modifiers::empty()),
            b'B' => key_event(KeySymbol::Down, Modifiers::empty()),
            b'C' => key_event(KeySymbol::Right, Modifiers::empty()),
            b'D' => key_event(KeySymbol::Left, Modifiers::empty()),
            b'Z' => key_event(KeySymbol::Tab, Modifiers::SHIFT),
            b'I' => Some(BackendEvent::FocusGained),
            b'O' => Some(BackendEvent::FocusLost),
            other => {
                trace!("ConsoleDriver: Ignoring CSI sequence with final {:#04x}.", other);
                None
            }
        };
        return (event, consumed);
    }

    // ESC followed by a printable is the Alt-modified key.
    if (0x20..=0x7e).contains(&bytes[1]) {
        return (
            key_event(KeySymbol::Char(bytes[1] as char), Modifiers::ALT),
            2,
        );
    }
    trace!("ConsoleDriver: Ignoring escape sequence starting {:#04x}.", bytes[1]);
    (None, 2)
}

fn key_event(symbol: KeySymbol, modifiers: Modifiers) -> Option<BackendEvent> {
    Some(BackendEvent::Key { symbol, modifiers })
}

fn format_cursor_position(row_1_based: u16, col_1_based: u16) -> String {
    format!("\x1b[{};{}H", row_1_based, col_1_based)
}

fn format_sgr_colors(fg: Rgb, bg: Rgb) -> String {
    format!(
        "\x1b[38;2;{};{};{};48;2;{};{};{}m",
        fg.r, fg.g, fg.b, bg.r, bg.g, bg.b
    )
}

fn query_terminal_size(fd: RawFd) -> (u16, u16) {
    unsafe {
        let mut winsz: winsize = mem::zeroed();
        if libc::ioctl(fd, TIOCGWINSZ, &mut winsz) == -1 {
            warn!(
                "ConsoleDriver: ioctl(TIOCGWINSZ) failed: {}. Using default size.",
                std::io::Error::last_os_error()
            );
            return (DEFAULT_WIDTH_CELLS, DEFAULT_HEIGHT_CELLS);
        }
        let cols = if winsz.ws_col == 0 {
            DEFAULT_WIDTH_CELLS
        } else {
            winsz.ws_col
        };
        let rows = if winsz.ws_row == 0 {
            DEFAULT_HEIGHT_CELLS
        } else {
            winsz.ws_row
        };
        (cols, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(symbol: KeySymbol, modifiers: Modifiers) -> BackendEvent {
        BackendEvent::Key { symbol, modifiers }
    }

    #[test]
    fn printable_bytes_become_plain_chars() {
        let events = parse_input(b"qW 3");
        assert_eq!(
            events,
            vec![
                key(KeySymbol::Char('q'), Modifiers::empty()),
                key(KeySymbol::Char('W'), Modifiers::empty()),
                key(KeySymbol::Char(' '), Modifiers::empty()),
                key(KeySymbol::Char('3'), Modifiers::empty()),
            ]
        );
    }

    #[test]
    fn control_bytes_carry_the_control_modifier() {
        assert_eq!(
            parse_input(&[0x03, 0x11]),
            vec![
                key(KeySymbol::Char('c'), Modifiers::CONTROL),
                key(KeySymbol::Char('q'), Modifiers::CONTROL),
            ]
        );
    }

    #[test]
    fn arrows_and_back_tab_decode() {
        let events = parse_input(b"\x1b[A\x1b[B\x1b[C\x1b[D\x1b[Z");
        assert_eq!(
            events,
            vec![
                key(KeySymbol::Up, Modifiers::empty()),
                key(KeySymbol::Down, Modifiers::empty()),
                key(KeySymbol::Right, Modifiers::empty()),
                key(KeySymbol::Left, Modifiers::empty()),
                key(KeySymbol::Tab, Modifiers::SHIFT),
            ]
        );
    }

    #[test]
    fn enter_tab_and_backspace_decode() {
        assert_eq!(
            parse_input(&[b'\t', b'\r', 0x7f]),
            vec![
                key(KeySymbol::Tab, Modifiers::empty()),
                key(KeySymbol::Enter, Modifiers::empty()),
                key(KeySymbol::Backspace, Modifiers::empty()),
            ]
        );
    }

    #[test]
    fn focus_reports_decode() {
        assert_eq!(
            parse_input(b"\x1b[I\x1b[O"),
            vec![BackendEvent::FocusGained, BackendEvent::FocusLost]
        );
    }

    #[test]
    fn lone_escape_is_the_escape_key() {
        assert_eq!(
            parse_input(&[0x1b]),
            vec![key(KeySymbol::Escape, Modifiers::empty())]
        );
    }

    #[test]
    fn alt_chords_decode() {
        assert_eq!(
            parse_input(b"\x1bx"),
            vec![key(KeySymbol::Char('x'), Modifiers::ALT)]
        );
    }

    #[test]
    fn unknown_csi_sequences_are_skipped_without_desync() {
        // F5 (CSI 15~) is not bound; the trailing 'q' must still decode.
        assert_eq!(
            parse_input(b"\x1b[15~q"),
            vec![key(KeySymbol::Char('q'), Modifiers::empty())]
        );
    }

    #[test]
    fn modified_arrow_still_moves() {
        // Shift+Left arrives as CSI 1;2D. The modifier is dropped but the
        // direction survives.
        assert_eq!(
            parse_input(b"\x1b[1;2D"),
            vec![key(KeySymbol::Left, Modifiers::empty())]
        );
    }

    #[test]
    fn truncated_csi_at_end_of_burst_is_dropped() {
        assert_eq!(parse_input(b"\x1b["), Vec::<BackendEvent>::new());
    }
}
