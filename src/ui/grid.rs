use flashgrid::sinks::Position;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const COLUMNS: usize = 3;

/// Splits `area` into `count` equally sized cells, row-major, `COLUMNS` wide.
pub fn panel_rects(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 || area.is_empty() {
        return Vec::new();
    }
    let columns = COLUMNS.min(count);
    let rows = count.div_ceil(columns);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row)
                .to_vec()
        })
        .take(count)
        .collect()
}

pub fn hit_test(rects: &[Rect], column: u16, row: u16) -> Option<usize> {
    rects.iter().position(|r| {
        column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
    })
}

pub fn center(rect: Rect) -> Position {
    Position::new(
        rect.x as f64 + rect.width as f64 / 2.0,
        rect.y as f64 + rect.height as f64 / 2.0,
    )
}

/// Number keys address panels in reading order, starting at 1.
pub fn key_to_panel(c: char, count: usize) -> Option<usize> {
    c.to_digit(10)
        .map(|d| d as usize)
        .filter(|&d| d >= 1 && d <= count)
        .map(|d| d - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_panels_fill_a_three_by_three_grid() {
        let rects = panel_rects(Rect::new(0, 0, 30, 9), 9);
        assert_eq!(rects.len(), 9);
        assert_eq!(rects[0], Rect::new(0, 0, 10, 3));
        assert_eq!(rects[8], Rect::new(20, 6, 10, 3));
    }

    #[test]
    fn partial_last_row() {
        let rects = panel_rects(Rect::new(0, 0, 30, 6), 4);
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[3].y, rects[3].height);
    }

    #[test]
    fn empty_area_has_no_cells() {
        assert!(panel_rects(Rect::new(0, 0, 0, 0), 9).is_empty());
    }

    #[test]
    fn centers_hit_their_own_cell() {
        let rects = panel_rects(Rect::new(2, 1, 60, 18), 9);
        for (i, rect) in rects.iter().enumerate() {
            let c = center(*rect);
            assert_eq!(hit_test(&rects, c.x as u16, c.y as u16), Some(i));
        }
    }

    #[test]
    fn clicks_outside_the_grid_miss_every_cell() {
        let rects = panel_rects(Rect::new(5, 5, 30, 9), 9);
        assert_eq!(hit_test(&rects, 0, 0), None);
        assert_eq!(hit_test(&rects, 35, 5), None);
    }

    #[test]
    fn number_keys_map_to_panels() {
        assert_eq!(key_to_panel('1', 9), Some(0));
        assert_eq!(key_to_panel('9', 9), Some(8));
        assert_eq!(key_to_panel('0', 9), None);
        assert_eq!(key_to_panel('5', 4), None);
        assert_eq!(key_to_panel('x', 9), None);
    }
}
