//! Literals and variables.
use std::{fmt, ops};

/// The backing type used to represent literals and variables.
///
/// Unlike solvers that pack a variable index and a sign bit into a single unsigned code, this
/// type stores the literal exactly as the clause database arena stores it: a nonzero signed
/// integer whose magnitude is the 1-based variable index and whose sign is the polarity.
pub type LitIdx = i32;

/// A boolean variable.
///
/// Variables are numbered `1..=n`, matching the DIMACS CNF convention directly (there is no
/// internal 0-based renumbering), since the clause database stores literals as raw signed
/// variable indices and renumbering them would just add an indirection for no benefit.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Var {
    index: LitIdx,
}

impl Var {
    /// Creates a variable from its 1-based DIMACS CNF index.
    ///
    /// The parameter must be positive and may not represent a variable past
    /// [`Var::max_var()`].
    #[inline]
    pub fn from_dimacs(number: isize) -> Var {
        debug_assert!(number > 0);
        debug_assert!(number as usize <= Var::max_var().index());
        Var {
            index: number as LitIdx,
        }
    }

    /// Creates a variable from a 1-based index.
    #[inline]
    pub fn from_index(index: usize) -> Var {
        Var::from_dimacs(index as isize)
    }

    /// The 1-based index representing this variable in the DIMACS CNF encoding.
    #[inline]
    pub const fn to_dimacs(self) -> isize {
        self.index as isize
    }

    /// The 1-based index representing this variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// The variable with largest index that is supported.
    ///
    /// Kept well below `LitIdx::max_value()` so that the clause database arena, which is also
    /// indexed with `LitIdx`-sized offsets in places, never overflows while growing.
    pub const fn max_var() -> Var {
        Var {
            index: LitIdx::max_value() >> 4,
        }
    }

    /// Largest number of variables supported.
    pub const fn max_count() -> usize {
        Self::max_var().index()
    }

    /// Creates a literal from this var and a `bool` that is `true` when the literal is positive.
    #[inline]
    pub fn lit(self, polarity: bool) -> Lit {
        Lit::from_var(self, polarity)
    }

    /// Creates a positive literal from this var.
    #[inline]
    pub fn positive(self) -> Lit {
        Lit::positive(self)
    }

    /// Creates a negative literal from this var.
    #[inline]
    pub fn negative(self) -> Lit {
        Lit::negative(self)
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A boolean literal: a variable or its negation.
///
/// Stored exactly as it would be written into the clause database: a nonzero signed integer, the
/// negative of a variable's index for the negated literal.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Lit {
    value: LitIdx,
}

impl Lit {
    /// Creates a literal from a `Var` and a `bool` that is `true` when the literal is positive.
    #[inline]
    pub fn from_var(var: Var, polarity: bool) -> Lit {
        Lit {
            value: if polarity { var.index } else { -var.index },
        }
    }

    /// Create a positive literal from a `Var`.
    #[inline]
    pub fn positive(var: Var) -> Lit {
        Lit::from_var(var, true)
    }

    /// Create a negative literal from a `Var`.
    #[inline]
    pub fn negative(var: Var) -> Lit {
        Lit::from_var(var, false)
    }

    /// Creates a literal from a variable index and a `bool` that is `true` when the literal is
    /// positive.
    #[inline]
    pub fn from_index(index: usize, polarity: bool) -> Lit {
        Lit::from_var(Var::from_index(index), polarity)
    }

    /// Creates a literal from an integer using the DIMACS CNF convention: the absolute value is
    /// the 1-based variable index, the sign is the polarity.
    #[inline]
    pub fn from_dimacs(number: isize) -> Lit {
        Lit::from_var(Var::from_dimacs(number.abs()), number > 0)
    }

    /// Creates a literal directly from its raw arena representation.
    ///
    /// `value` must be nonzero; this is how a literal is actually stored in the clause database.
    #[inline]
    pub fn from_raw(value: LitIdx) -> Lit {
        debug_assert!(value != 0);
        Lit { value }
    }

    /// The raw value as stored in the clause database arena.
    #[inline]
    pub const fn raw(self) -> LitIdx {
        self.value
    }

    /// 1-based integer representation of the literal, opposite of [`Lit::from_dimacs`].
    #[inline]
    pub const fn to_dimacs(self) -> isize {
        self.value as isize
    }

    /// The literal's variable.
    #[inline]
    pub fn var(self) -> Var {
        Var {
            index: self.value.abs(),
        }
    }

    /// 0-based index of the literal's variable, convenient for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.var().index() - 1
    }

    /// Whether the literal is negative, i.e. a negated variable.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.value < 0
    }

    /// Whether the literal is positive, i.e. a non-negated variable.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.value > 0
    }

    /// A 0-based index suitable for indexing a `Vec` offset to accommodate both signs, i.e. an
    /// array accessed as `array[n + lit.offset()]` for an array built with `2n + 1` entries.
    #[inline]
    pub fn offset(self) -> isize {
        self.value as isize
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit { value: -self.value }
    }
}

impl ops::BitXor<bool> for Lit {
    type Output = Lit;

    #[inline]
    fn bitxor(self, rhs: bool) -> Lit {
        if rhs {
            !self
        } else {
            self
        }
    }
}

impl From<Var> for Lit {
    #[inline]
    fn from(var: Var) -> Lit {
        Lit::positive(var)
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// Uses the 1-based DIMACS CNF encoding.
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use super::*;
    use proptest::{prelude::*, *};

    pub fn var(index: impl Strategy<Value = usize>) -> impl Strategy<Value = Var> {
        index.prop_map(|index| Var::from_index(index + 1))
    }

    pub fn lit(index: impl Strategy<Value = usize>) -> impl Strategy<Value = Lit> {
        (var(index), bool::ANY).prop_map(|(var, polarity)| var.lit(polarity))
    }
}
