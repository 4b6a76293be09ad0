use num::{
    BigInt,
    BigRational,
    One,
    ToPrimitive,
    Zero,
};

use crate::data_structs::typedef::CellIdx;
use crate::data_structs::{
    DnaSequence,
    Nucleotide,
};
use crate::error::{
    KaosError,
    Result,
};

/// Exact point of the chaos game representation in `[-1, 1]²`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CgrPoint {
    x: BigRational,
    y: BigRational,
}

impl CgrPoint {
    pub fn new(
        x: BigRational,
        y: BigRational,
    ) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(BigRational::zero(), BigRational::zero())
    }

    /// Runs the chaos game over `sequence`, starting at the origin.
    pub fn from_sequence(sequence: &DnaSequence) -> Self {
        sequence
            .iter()
            .fold(Self::origin(), |point, base| point.step(*base))
    }

    /// Centre of cell `(row, col)` in a grid with `side` cells per axis.
    ///
    /// For a grid at zoom `n` this is exactly the point reached by the
    /// length-`n` sequence living in that cell.
    pub fn from_cell(
        row: CellIdx,
        col: CellIdx,
        side: CellIdx,
    ) -> Result<Self> {
        check_cell(row, col, side)?;
        let centre = |index: CellIdx| {
            BigRational::new(
                BigInt::from(2 * i64::from(index) - 1 - i64::from(side)),
                BigInt::from(side),
            )
        };
        Ok(Self::new(centre(col), centre(row)))
    }

    pub fn x(&self) -> &BigRational {
        &self.x
    }

    pub fn y(&self) -> &BigRational {
        &self.y
    }

    /// Moves halfway toward the corner of `base`.
    pub fn step(
        &self,
        base: Nucleotide,
    ) -> Self {
        let half = BigRational::new(BigInt::one(), BigInt::from(2));
        let (corner_x, corner_y) = base.corner();
        let x = &self.x
            + (BigRational::from_integer(BigInt::from(corner_x)) - &self.x) * &half;
        let y = &self.y
            + (BigRational::from_integer(BigInt::from(corner_y)) - &self.y) * &half;
        Self::new(x, y)
    }

    /// `(row, col)` of the point in a grid with `side` cells per axis.
    pub fn cell(
        &self,
        side: CellIdx,
    ) -> Result<(CellIdx, CellIdx)> {
        Ok((to_cell(&self.y, side)?, to_cell(&self.x, side)?))
    }
}

/// `ceil((coordinate + 1) * side / 2)`, computed exactly.
pub fn to_cell(
    coordinate: &BigRational,
    side: CellIdx,
) -> Result<CellIdx> {
    if side == 0 {
        return Err(KaosError::domain("grid side must be positive"));
    }
    let scaled = (coordinate + BigRational::one())
        * BigRational::new(BigInt::from(side), BigInt::from(2));
    let index = scaled
        .ceil()
        .to_integer()
        .to_u32()
        .filter(|index| (1..=side).contains(index))
        .ok_or_else(|| {
            KaosError::domain(format!(
                "coordinate {} is outside of the CGR square",
                coordinate
            ))
        })?;
    Ok(index)
}

pub(crate) fn check_cell(
    row: CellIdx,
    col: CellIdx,
    side: CellIdx,
) -> Result<()> {
    if side == 0 {
        return Err(KaosError::domain("grid side must be positive"));
    }
    if row == 0 || row > side || col == 0 || col > side {
        return Err(KaosError::domain(format!(
            "cell ({}, {}) is outside of a grid with side {}",
            row, col, side
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn rational(
        numer: i64,
        denom: i64,
    ) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    #[test]
    fn test_single_base_points() {
        let a = CgrPoint::from_sequence(&DnaSequence::from_str("A").unwrap());
        assert_eq!(a, CgrPoint::new(rational(-1, 2), rational(1, 2)));
        let c = CgrPoint::from_sequence(&DnaSequence::from_str("c").unwrap());
        assert_eq!(c, CgrPoint::new(rational(1, 2), rational(-1, 2)));
    }

    #[test]
    fn test_two_base_point() {
        // (0,0) -> G (-1/2,-1/2) -> T (1/4, 1/4)
        let gt = CgrPoint::from_sequence(&DnaSequence::from_str("GT").unwrap());
        assert_eq!(gt, CgrPoint::new(rational(1, 4), rational(1, 4)));
        assert_eq!(gt.cell(4).unwrap(), (3, 3));
    }

    #[test]
    fn test_empty_sequence_is_origin() {
        assert_eq!(
            CgrPoint::from_sequence(&DnaSequence::default()),
            CgrPoint::origin()
        );
    }

    #[test]
    fn test_to_cell_bounds() {
        assert_eq!(to_cell(&rational(-3, 4), 4).unwrap(), 1);
        assert_eq!(to_cell(&rational(3, 4), 4).unwrap(), 4);
        assert!(to_cell(&rational(-1, 1), 4).is_err());
        assert!(to_cell(&rational(1, 4), 0).is_err());
        assert!(to_cell(&rational(3, 1), 4).is_err());
    }

    #[test]
    fn test_cell_centre_matches_forward_map() {
        let seq = DnaSequence::from_str("ACGTTA").unwrap();
        let point = CgrPoint::from_sequence(&seq);
        let (row, col) = point.cell(64).unwrap();
        assert_eq!(CgrPoint::from_cell(row, col, 64).unwrap(), point);
    }

    #[test]
    fn test_from_cell_rejects_outside() {
        assert!(CgrPoint::from_cell(0, 1, 4).is_err());
        assert!(CgrPoint::from_cell(1, 5, 4).is_err());
        assert!(CgrPoint::from_cell(1, 1, 0).is_err());
    }
}
