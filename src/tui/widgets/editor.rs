use ratatui::layout::Rect;
use std::cmp;

/// Small text editor backing the add bar and the prompt dialogs.
/// Columns are counted in chars, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // Vertical scroll (line offset)
    pub scroll_col: usize,    // Horizontal scroll (column offset)
    pub single_line: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            scroll_col: 0,
            single_line: false,
        }
    }

    pub fn single_line() -> Self {
        Self {
            single_line: true,
            ..Self::new()
        }
    }

    /// Editor holding `content` with the cursor at its end
    pub fn from_string(content: &str, single_line: bool) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else if single_line {
            vec![content.replace('\n', " ")]
        } else {
            content.split('\n').map(|s| s.to_string()).collect()
        };
        let cursor_line = lines.len().saturating_sub(1);
        let cursor_col = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Self {
            lines,
            cursor_line,
            cursor_col,
            scroll_offset: 0,
            scroll_col: 0,
            single_line,
        }
    }

    fn ensure_cursor_valid(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.cursor_line >= self.lines.len() {
            self.cursor_line = self.lines.len() - 1;
        }
        let len = self.current_line_len();
        self.cursor_col = cmp::min(self.cursor_col, len);
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self {
            single_line: self.single_line,
            ..Self::new()
        };
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.ensure_cursor_valid();
        let col = self.cursor_col;
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let mut chars: Vec<char> = line.chars().collect();
            chars.insert(col, ch);
            *line = chars.into_iter().collect();
            self.cursor_col += 1;
        }
    }

    /// Insert a line break; single-line editors ignore it
    pub fn insert_newline(&mut self) {
        if self.single_line {
            return;
        }
        self.ensure_cursor_valid();
        let col = self.cursor_col;
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let mut chars: Vec<char> = line.chars().collect();
            let remainder: String = chars.split_off(col).into_iter().collect();
            *line = chars.into_iter().collect();
            self.lines.insert(self.cursor_line + 1, remainder);
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    /// Backspace: delete the char before the cursor, joining lines at column 0
    pub fn delete_char(&mut self) {
        self.ensure_cursor_valid();
        if self.cursor_col > 0 {
            let col = self.cursor_col;
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let mut chars: Vec<char> = line.chars().collect();
                chars.remove(col - 1);
                *line = chars.into_iter().collect();
                self.cursor_col -= 1;
            }
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            if let Some(prev) = self.lines.get_mut(self.cursor_line) {
                self.cursor_col = prev.chars().count();
                prev.push_str(&current);
            }
        }
    }

    /// Delete key: remove the char under the cursor
    pub fn delete_forward(&mut self) {
        self.ensure_cursor_valid();
        let len = self.current_line_len();
        if self.cursor_col < len {
            let col = self.cursor_col;
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let mut chars: Vec<char> = line.chars().collect();
                chars.remove(col);
                *line = chars.into_iter().collect();
            }
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                line.push_str(&next);
            }
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.ensure_cursor_valid();
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_cursor_right(&mut self) {
        self.ensure_cursor_valid();
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.ensure_cursor_valid();
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.ensure_cursor_valid();
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.ensure_cursor_valid();
        self.cursor_col = self.current_line_len();
    }

    /// Keep the cursor line inside a viewport of `viewport_height` lines
    pub fn update_scroll(&mut self, viewport_height: usize) {
        let viewport_height = viewport_height.max(1);
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line + 1 - viewport_height;
        }
    }

    /// Keep the cursor column inside a viewport of `viewport_width` chars
    pub fn update_horizontal_scroll(&mut self, viewport_width: usize) {
        let viewport_width = viewport_width.max(1);
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + viewport_width {
            self.scroll_col = self.cursor_col + 1 - viewport_width;
        }
    }

    /// Lines visible in the viewport, already cut to the horizontal scroll
    pub fn get_visible_lines(&self, viewport_height: usize, viewport_width: usize) -> Vec<String> {
        self.lines
            .iter()
            .skip(self.scroll_offset)
            .take(viewport_height)
            .map(|line| line.chars().skip(self.scroll_col).take(viewport_width).collect())
            .collect()
    }

    /// Screen position of the cursor inside `area` (no borders), if visible
    pub fn get_cursor_screen_pos(&self, area: Rect) -> Option<(u16, u16)> {
        let row = self.cursor_line.checked_sub(self.scroll_offset)?;
        let col = self.cursor_col.checked_sub(self.scroll_col)?;
        if row >= area.height as usize || col >= area.width as usize {
            return None;
        }
        Some((area.x + col as u16, area.y + row as u16))
    }
}

impl std::fmt::Display for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.insert_char(ch);
        }
    }

    #[test]
    fn single_line_editor_ignores_newlines() {
        let mut editor = Editor::single_line();
        type_str(&mut editor, "Aloe\nVera");
        assert_eq!(editor.to_string(), "AloeVera");
        assert_eq!(editor.lines.len(), 1);
    }

    #[test]
    fn backspace_joins_lines_and_handles_multibyte() {
        let mut editor = Editor::from_string("água\nfria", false);
        assert_eq!((editor.cursor_line, editor.cursor_col), (1, 4));
        editor.move_cursor_home();
        editor.delete_char();
        assert_eq!(editor.to_string(), "águafria");
        assert_eq!(editor.cursor_col, 4);
        editor.move_cursor_home();
        editor.delete_forward();
        assert_eq!(editor.to_string(), "guafria");
    }

    #[test]
    fn from_string_keeps_blank_lines() {
        let editor = Editor::from_string("a\n\nb", false);
        assert_eq!(editor.lines, vec!["a", "", "b"]);
        assert_eq!(editor.to_string(), "a\n\nb");
    }

    #[test]
    fn horizontal_scroll_follows_cursor() {
        let mut editor = Editor::from_string("Phalaenopsis", true);
        editor.update_horizontal_scroll(5);
        assert_eq!(editor.scroll_col, 8);
        assert_eq!(editor.get_visible_lines(1, 5), vec!["psis"]);
        let area = Rect::new(10, 3, 5, 1);
        assert_eq!(editor.get_cursor_screen_pos(area), Some((14, 3)));
    }

    #[test]
    fn clear_keeps_mode() {
        let mut editor = Editor::from_string("Fern", true);
        editor.clear();
        assert!(editor.is_empty());
        assert!(editor.single_line);
    }
}
