use ratatui::layout::{Constraint, Flex, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: typing area + stats sidebar
    Medium, // 60-99 cols: full-width typing, stats in the header
    Narrow, // <60 cols: full-width typing, no jamo strip
}

impl LayoutTier {
    pub fn for_width(width: u16) -> Self {
        match width {
            100.. => LayoutTier::Wide,
            60..=99 => LayoutTier::Medium,
            _ => LayoutTier::Narrow,
        }
    }

    pub fn show_sidebar(self) -> bool {
        self == LayoutTier::Wide
    }

    pub fn show_jamo_strip(self, height: u16) -> bool {
        height >= 16 && self != LayoutTier::Narrow
    }
}

/// Regions of the test screen.
pub struct TestLayout {
    pub header: Rect,
    pub typing: Rect,
    pub progress: Rect,
    pub jamo: Option<Rect>,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl TestLayout {
    /// `want_jamo` asks for the jamo strip; it is still dropped when the
    /// terminal is too small.
    pub fn new(area: Rect, want_jamo: bool) -> Self {
        let tier = LayoutTier::for_width(area.width);
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .areas(area);

        let (main, sidebar) = if tier.show_sidebar() {
            let [main, side] =
                Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                    .areas(body);
            (main, Some(side))
        } else {
            (body, None)
        };

        let (typing, progress, jamo) = if want_jamo && tier.show_jamo_strip(area.height) {
            let [typing, progress, jamo] = Layout::vertical([
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .areas(main);
            (typing, progress, Some(jamo))
        } else {
            let [typing, progress] =
                Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).areas(main);
            (typing, progress, None)
        };

        Self {
            header,
            typing,
            progress,
            jamo,
            sidebar,
            footer,
            tier,
        }
    }
}

/// Greedily pack hints into as few lines as fit `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if width == 0 {
        return lines;
    }
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 2 + hint.chars().count() <= width => {
                line.push_str("  ");
                line.push_str(hint);
            }
            _ => lines.push(format!("  {hint}")),
        }
    }
    lines
}

fn percent_of(length: u16, percent: u16) -> u16 {
    (u32::from(length) * u32::from(percent.min(100)) / 100) as u16
}

/// A centred popup of the given share of `area`, but never smaller than
/// 50x12 unless `area` itself is.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 12;

    let width = percent_of(area.width, percent_x).max(MIN_WIDTH).min(area.width);
    let height = percent_of(area.height, percent_y).max(MIN_HEIGHT).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(LayoutTier::for_width(120), LayoutTier::Wide);
        assert_eq!(LayoutTier::for_width(80), LayoutTier::Medium);
        assert_eq!(LayoutTier::for_width(40), LayoutTier::Narrow);
    }

    #[test]
    fn test_test_layout_regions() {
        let wide = TestLayout::new(Rect::new(0, 0, 120, 40), true);
        assert!(wide.sidebar.is_some());
        assert!(wide.jamo.is_some());

        let medium = TestLayout::new(Rect::new(0, 0, 80, 24), false);
        assert!(medium.sidebar.is_none());
        assert!(medium.jamo.is_none());

        let short = TestLayout::new(Rect::new(0, 0, 80, 12), true);
        assert!(short.jamo.is_none());
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[a] one", "[b] two", "[c] three"], 20);
        assert_eq!(lines, vec!["  [a] one  [b] two", "  [c] three"]);
        assert!(pack_hint_lines(&["x"], 0).is_empty());
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered_rect(50, 50, area);
        assert!(r.width <= area.width && r.height <= area.height);
        let big = Rect::new(0, 0, 200, 60);
        let r = centered_rect(50, 50, big);
        assert_eq!((r.x, r.y, r.width, r.height), (50, 15, 100, 30));
    }
}
