use std::{cmp::Ordering, marker::PhantomData, ops::Add};

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is non-negative (zero or greater).
///
/// Category loss totals are `Constrained<Power, NonNegative>`: a unit that
/// appears to gain exergy contributes zero, never negative destruction.
///
/// # Examples
///
/// ```
/// use twine_exergy::support::constraint::{Constrained, NonNegative};
///
/// let x = Constrained::<_, NonNegative>::new(5.0).unwrap();
/// assert_eq!(x.into_inner(), 5.0);
///
/// assert!(NonNegative::new(0.0).is_ok());
/// assert!(NonNegative::new(-7.0).is_err());
/// assert!(NonNegative::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs a [`Constrained<T, NonNegative>`] if the value is non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
    }

    /// Returns zero as a non-negative constrained value.
    #[must_use]
    pub fn zero<T: PartialOrd + Zero>() -> Constrained<T, NonNegative> {
        Constrained::<T, NonNegative>::zero()
    }

    /// Clamps a value into the non-negative range.
    ///
    /// Negative values and `NaN` both map to zero.
    #[must_use]
    pub fn clamp<T: PartialOrd + Zero>(value: T) -> Constrained<T, NonNegative> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Constrained {
                value,
                _marker: PhantomData,
            },
            _ => Self::zero(),
        }
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

/// The sum of two non-negative values is non-negative.
///
/// # Panics
///
/// Panics in debug builds if the sum is negative, which can only happen if
/// `T`'s addition is not monotone.
impl<T> Add for Constrained<T, NonNegative>
where
    T: Add<Output = T> + PartialOrd + Zero,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let sum = self.value + rhs.value;
        debug_assert!(sum >= T::zero(), "non-negative sum went negative");
        Self {
            value: sum,
            _marker: PhantomData,
        }
    }
}

impl<T: PartialOrd + Zero> Zero for Constrained<T, NonNegative> {
    fn zero() -> Self {
        Self {
            value: T::zero(),
            _marker: PhantomData,
        }
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}
