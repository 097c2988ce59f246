use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_point_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// How a displayed person relates to the primary person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeType {
    Primary,
    Related,
    Spouse,
    Sibling,
    /// Half-sibling grouped on the left (shared father).
    SiblingLeft,
    /// Half-sibling grouped on the right (shared mother).
    SiblingRight,
}

/// An opacity transition request. The layout engine only records these;
/// a presentation layer takes and plays them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FadeTransition {
    pub from: f32,
    pub to: f32,
    pub delay_ms: f32,
    pub duration_ms: f32,
}

/// Index path to a node inside the row/group tree. Stands in for a direct
/// node reference so connectors stay free of lifetimes; resolving through
/// the row list yields the node's absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectorEnd {
    pub row: usize,
    pub group: usize,
    pub node: usize,
}
