//! Read-only field mirroring the highlighted entry's location.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Renders the path field and remembers where it was drawn for click hit-testing.
#[derive(Debug, Default)]
pub struct PathField {
    area: Option<Rect>,
}

impl PathField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect, path: Option<&str>) {
        self.area = Some(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Path · click or y to copy")
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = match path {
            Some(text) => Paragraph::new(text.to_owned()).style(Style::default().fg(Color::White)),
            None => Paragraph::new("nothing highlighted").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        };
        frame.render_widget(paragraph.block(block), area);
    }

    /// Whether a terminal cell lies inside the most recently drawn field.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.is_some_and(|area| {
            column >= area.x
                && column < area.x.saturating_add(area.width)
                && row >= area.y
                && row < area.y.saturating_add(area.height)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn hit_test_follows_rendered_area() {
        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut field = PathField::new();
        assert!(!field.contains(1, 1));

        terminal
            .draw(|frame| {
                let area = Rect::new(0, 3, 40, 3);
                field.render(frame, area, Some(r"C:\Apps\Foo\foo.exe"));
            })
            .unwrap();

        assert!(field.contains(5, 4));
        assert!(!field.contains(5, 1));
    }
}
