// filepath: photo-board/src/layout.rs
use crate::config::BoardConfig;
use crate::surface::{Rect, Size};

/// Calculated areas for the button grid and the viewer frame
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub buttons: Vec<Rect>,
    pub viewer: Rect,
}

/// Lay buttons out row by row in `config.columns` equal columns, with the
/// viewer filling the space between the grid and the log panel.
pub fn calculate_board_layout(
    config: &BoardConfig,
    surface: Size,
    button_count: usize,
    log_height: f64,
) -> BoardLayout {
    let padding = config.padding;
    let columns = config.columns.max(1);
    let button_height = config.button_height;
    let button_width =
        ((surface.width - padding * (columns as f64 + 1.0)) / columns as f64).max(0.0);

    let buttons = (0..button_count)
        .map(|i| {
            let (row, col) = ((i / columns) as f64, (i % columns) as f64);
            Rect::from_xywh(
                padding + col * (button_width + padding),
                padding + row * (button_height + padding),
                button_width,
                button_height,
            )
        })
        .collect();

    let rows = button_count.div_ceil(columns) as f64;
    let viewer_y = rows * button_height + (rows + 1.0) * padding;
    let viewer = Rect::from_xywh(
        padding,
        viewer_y,
        (surface.width - padding * 2.0).max(0.0),
        (surface.height - (viewer_y + log_height) - padding * 2.0).max(0.0),
    );

    BoardLayout { buttons, viewer }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_grid() {
        let config = BoardConfig::default();
        let layout = calculate_board_layout(&config, Size::new(420.0, 600.0), 4, 84.0);

        assert_eq!(
            layout.buttons,
            vec![
                Rect::from_xywh(20.0, 20.0, 180.0, 50.0),
                Rect::from_xywh(220.0, 20.0, 180.0, 50.0),
                Rect::from_xywh(20.0, 90.0, 180.0, 50.0),
                Rect::from_xywh(220.0, 90.0, 180.0, 50.0),
            ]
        );
        assert_eq!(layout.viewer, Rect::from_xywh(20.0, 160.0, 380.0, 316.0));
    }

    #[test]
    fn partial_last_row_still_reserves_a_row() {
        let config = BoardConfig {
            columns: 3,
            ..BoardConfig::default()
        };
        let layout = calculate_board_layout(&config, Size::new(320.0, 400.0), 4, 36.0);

        assert_eq!(layout.buttons[3], Rect::from_xywh(20.0, 90.0, 80.0, 50.0));
        assert_eq!(layout.viewer.origin.y, 160.0);
    }

    #[test]
    fn tiny_surface_never_goes_negative() {
        let layout = calculate_board_layout(&BoardConfig::default(), Size::new(10.0, 10.0), 2, 36.0);
        assert!(layout.buttons.iter().all(|r| r.size.width == 0.0));
        assert_eq!(layout.viewer.size, Size::new(0.0, 0.0));
    }
}
