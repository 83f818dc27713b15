use core::fmt;
use gs_crypto_utils::NumberTheoryError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupError {
    /// `multi_base_exp` called with differing numbers of bases and exponents
    UnequalSizeBasesAndExponents(usize, usize),
    /// Value outside `[1, modulus)` or not a quadratic residue
    ElementOutsideGroup,
    /// Operands belong to groups with different moduli
    MismatchedGroups,
    /// `order()` requested on a group whose factorization is unknown
    UnknownGroupOrder,
    /// `generator()` requested on a group reconstructed from wire data
    GeneratorNotConfigured,
    /// The element has no inverse modulo the group's modulus
    NonInvertibleElement,
    /// A group construction invariant failed, e.g. a factor is not prime
    FactorNotPrime,
    /// Prime-order subgroup construction with `q' ∤ p - 1`
    OrderDoesNotDivideModulusMinusOne,
    /// Message vector longer than the key's base vector
    MessageCountMismatch(usize, usize),
    NumberTheory(NumberTheoryError),
}

impl From<NumberTheoryError> for GroupError {
    fn from(e: NumberTheoryError) -> Self {
        Self::NumberTheory(e)
    }
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnequalSizeBasesAndExponents(b, e) => {
                write!(f, "{} bases but {} exponents", b, e)
            }
            Self::ElementOutsideGroup => write!(f, "value is not a group element"),
            Self::MismatchedGroups => write!(f, "operands from different groups"),
            Self::UnknownGroupOrder => {
                write!(f, "group order unavailable without the factorization")
            }
            Self::GeneratorNotConfigured => {
                write!(f, "group handle carries no generator")
            }
            Self::NonInvertibleElement => write!(f, "element is not invertible"),
            Self::FactorNotPrime => write!(f, "group factor failed the primality test"),
            Self::OrderDoesNotDivideModulusMinusOne => {
                write!(f, "subgroup order does not divide p - 1")
            }
            Self::MessageCountMismatch(m, b) => {
                write!(f, "{} messages for {} bases", m, b)
            }
            Self::NumberTheory(e) => write!(f, "{}", e),
        }
    }
}
