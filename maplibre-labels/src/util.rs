//! Utils which are used internally

pub trait SignificantlyDifferent<Rhs: ?Sized = Self> {
    type Epsilon;

    /// This method tests for `self` and `other` values to be significantly different
    #[must_use]
    fn ne(&self, other: &Rhs, epsilon: Self::Epsilon) -> bool;
}
