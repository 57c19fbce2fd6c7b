use plotters::style::{RGBAColor, RGBColor};

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
        }
    }
}

/// Chart style configuration
pub struct ChartStyle {
    pub line_width: u32,
    pub font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    pub point_radius: i32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 15,
            margin: 10,
            label_area_size: 50,
            point_radius: 5,
        }
    }
}

/// Series palette, primary series first.
pub const SERIES_PALETTE: [RGBColor; 5] = [
    RGBColor(54, 162, 235),
    RGBColor(255, 99, 132),
    RGBColor(75, 192, 192),
    RGBColor(255, 159, 64),
    RGBColor(153, 102, 255),
];

/// Color for the n-th series of a chart, wrapping around the palette.
pub fn series_color(index: usize) -> RGBColor {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}
