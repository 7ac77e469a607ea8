use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for card counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Caller-facing 1-based `(row, col)`, wide enough for any value a client may
/// send, in range or not.
pub type OneBased = (i64, i64);

/// Opaque player identity supplied with every call.
pub type PlayerId = String;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Axis of a rejected coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Axis {
    Row,
    Col,
}

/// Converts caller-facing 1-based coordinates into 0-based grid coordinates.
///
/// The row is checked before the column, so a pair that is out of range on
/// both axes reports [`Axis::Row`].
pub fn from_one_based((row, col): OneBased, size: Coord2) -> Result<Coord2, Axis> {
    let row = to_grid_index(row, size.0).ok_or(Axis::Row)?;
    let col = to_grid_index(col, size.1).ok_or(Axis::Col)?;
    Ok((row, col))
}

fn to_grid_index(one_based: i64, len: Coord) -> Option<Coord> {
    Coord::try_from(one_based.checked_sub(1)?)
        .ok()
        .filter(|&index| index < len)
}

pub trait GridSizeExt {
    fn grid_size(&self) -> Option<Coord2>;
}

impl<T> GridSizeExt for Array2<T> {
    fn grid_size(&self) -> Option<Coord2> {
        let (rows, cols) = self.dim();
        Some((rows.try_into().ok()?, cols.try_into().ok()?))
    }
}

/// Iterates every cell position of a `size` grid in row-major order.
pub fn iter_coords((rows, cols): Coord2) -> impl Iterator<Item = Coord2> {
    (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
}
