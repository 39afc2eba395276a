use crate::config::GameConfig;
use crate::model::card::GridPos;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BOARD_WIDTH: u32 = 800;
pub const DEFAULT_SPACING: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Square cells laid out row-major, `spacing` pixels between cells and around the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub origin: Point,
    pub card_size: u32,
    pub spacing: u32,
}

impl BoardLayout {
    pub const fn new(origin: Point, card_size: u32, spacing: u32) -> Self {
        Self {
            origin,
            card_size,
            spacing,
        }
    }

    /// Largest card size that fits `cols` cards plus spacing into `width`.
    pub fn fit(width: u32, cols: u8, spacing: u32) -> Self {
        let cols = u32::from(cols.max(1));
        let gutters = (cols + 1) * spacing;
        let card_size = width.saturating_sub(gutters) / cols;
        Self::new(Point::default(), card_size.max(1), spacing)
    }

    pub fn for_config(config: &GameConfig) -> Self {
        Self::fit(DEFAULT_BOARD_WIDTH, config.cols, DEFAULT_SPACING)
    }

    const fn pitch(&self) -> i64 {
        self.card_size as i64 + self.spacing as i64
    }

    pub fn cell_origin(&self, pos: GridPos) -> Point {
        let x = i64::from(self.origin.x) + i64::from(self.spacing) + i64::from(pos.col) * self.pitch();
        let y = i64::from(self.origin.y) + i64::from(self.spacing) + i64::from(pos.row) * self.pitch();
        Point::new(clamp_i32(x), clamp_i32(y))
    }

    pub fn cell_center(&self, pos: GridPos) -> Point {
        let origin = self.cell_origin(pos);
        let half = (self.card_size / 2) as i32;
        Point::new(origin.x.saturating_add(half), origin.y.saturating_add(half))
    }

    /// Grid cell under `point`. Card edges count as inside; gaps between cards hit nothing.
    pub fn cell_at(&self, point: Point, rows: u8, cols: u8) -> Option<GridPos> {
        let col = self.axis_index(i64::from(point.x) - i64::from(self.origin.x), cols)?;
        let row = self.axis_index(i64::from(point.y) - i64::from(self.origin.y), rows)?;
        Some(GridPos::new(row, col))
    }

    fn axis_index(&self, offset: i64, count: u8) -> Option<u8> {
        let inner = offset - i64::from(self.spacing);
        if inner < 0 || self.pitch() == 0 {
            return None;
        }
        let index = inner / self.pitch();
        let within = inner % self.pitch();
        if within > i64::from(self.card_size) || index >= i64::from(count) {
            return None;
        }
        u8::try_from(index).ok()
    }

}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
