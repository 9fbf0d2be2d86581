#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, PartialOrd, Ord)]
pub struct RowsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, PartialOrd, Ord)]
pub struct ColumnsCount(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, PartialOrd, Ord)]
pub struct RowIndex(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, PartialOrd, Ord)]
pub struct ColumnIndex(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, PartialOrd, Ord)]
pub struct NodesCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, PartialOrd, Ord)]
pub struct EdgesCount(pub usize);

/// World space distance between the centres of two adjacent cells.
#[derive(PartialEq, Copy, Clone, Debug, PartialOrd)]
pub struct HallWidth(pub f32);
/// World space height of every wall, floor to ceiling.
#[derive(PartialEq, Copy, Clone, Debug, PartialOrd)]
pub struct HallHeight(pub f32);
