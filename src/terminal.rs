// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::{Cell, Style};
use crate::frame::Frame;

/// Raw-mode alternate screen. Acquired by `new`, released on drop.
pub struct Terminal {
    stdout: Stdout,
    last: Option<LastFrame>,
    run_buf: String,
    row_dirty: Vec<Vec<usize>>,
}

struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

/// Tracks the attributes last sent so unchanged ones are not repeated.
#[derive(Default)]
struct Pen {
    style: Option<Style>,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn apply(&mut self, out: &mut Stdout, style: Style) -> Result<()> {
        let cur = self.style.unwrap_or_default();
        let first = self.style.is_none();
        if first || style.fg != cur.fg {
            out.queue(SetForegroundColor(style.fg.unwrap_or(Color::Reset)))?;
        }
        if first || style.bg != cur.bg {
            out.queue(SetBackgroundColor(style.bg.unwrap_or(Color::Reset)))?;
        }
        if first || style.bold != cur.bold {
            out.queue(SetAttribute(if style.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
        }
        self.style = Some(style);
        Ok(())
    }

    fn move_to(&mut self, out: &mut Stdout, x: u16, y: u16) -> Result<()> {
        if self.pos != Some((x, y)) {
            out.queue(cursor::MoveTo(x, y))?;
        }
        Ok(())
    }
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
            run_buf: String::with_capacity(64),
            row_dirty: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    /// Flushes the frame's changed cells to the screen.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let same_size = self
            .last
            .as_ref()
            .is_some_and(|l| l.width == frame.width && l.height == frame.height);

        if !same_size || frame.is_dirty_all() {
            self.draw_full(frame, !same_size)?;
        } else {
            self.draw_dirty(frame)?;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn draw_full(&mut self, frame: &Frame, resized: bool) -> Result<()> {
        if resized {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
        }
        let len = frame.width as usize * frame.height as usize;
        let mut cells = Vec::with_capacity(len);
        let mut pen = Pen::default();

        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let cell = frame.cell_at_index(y as usize * frame.width as usize + x as usize);
                pen.apply(&mut self.stdout, cell.style)?;
                self.stdout.queue(Print(cell.ch))?;
                cells.push(cell);
            }
        }

        self.last = Some(LastFrame {
            width: frame.width,
            height: frame.height,
            cells,
        });
        Ok(())
    }

    fn draw_dirty(&mut self, frame: &Frame) -> Result<()> {
        let Some(last) = self.last.as_mut() else {
            return Ok(());
        };
        let width = frame.width as usize;

        if self.row_dirty.len() != frame.height as usize {
            self.row_dirty = vec![Vec::new(); frame.height as usize];
        }
        for &idx in frame.dirty_indices() {
            if let Some(row) = self.row_dirty.get_mut(idx / width) {
                row.push(idx);
            }
        }

        let mut pen = Pen::default();
        for (y, row) in self.row_dirty.iter_mut().enumerate() {
            if row.is_empty() {
                continue;
            }
            row.sort_unstable();

            let mut i = 0usize;
            while i < row.len() {
                let idx0 = row[i];
                let cell0 = frame.cell_at_index(idx0);
                if last.cells[idx0] == cell0 {
                    i += 1;
                    continue;
                }
                last.cells[idx0] = cell0;

                // Extend over adjacent changed cells that share the style.
                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut run_len: u16 = 1;
                let mut prev = idx0;
                let mut j = i + 1;
                while j < row.len() {
                    let idx1 = row[j];
                    let cell1 = frame.cell_at_index(idx1);
                    if idx1 != prev + 1 || last.cells[idx1] == cell1 || cell1.style != cell0.style
                    {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    last.cells[idx1] = cell1;
                    run_len = run_len.saturating_add(1);
                    prev = idx1;
                    j += 1;
                }

                let x0 = (idx0 % width) as u16;
                let y0 = y as u16;
                pen.move_to(&mut self.stdout, x0, y0)?;
                pen.apply(&mut self.stdout, cell0.style)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                let next_x = x0.saturating_add(run_len);
                pen.pos = (next_x < frame.width).then_some((next_x, y0));
                i = j;
            }
            row.clear();
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}
