use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumberTheoryError {
    /// The extended Euclidean algorithm requires both arguments to be positive
    NonPositiveArgument,
    /// Jacobi symbol is only defined for odd positive moduli
    EvenModulus,
    /// CRT recombination requires distinct coprime factors
    FactorsNotCoprime,
    /// Requested a prime of fewer bits than the sampler supports
    BitLengthTooSmall(u64),
}

impl fmt::Display for NumberTheoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveArgument => {
                write!(f, "extended Euclid needs positive arguments")
            }
            Self::EvenModulus => write!(f, "Jacobi symbol needs an odd positive modulus"),
            Self::FactorsNotCoprime => write!(f, "CRT factors must be distinct and coprime"),
            Self::BitLengthTooSmall(bits) => {
                write!(f, "cannot sample a prime of {} bits", bits)
            }
        }
    }
}
