/*!
This library implements univariate orthonormal polynomials defined by their three-term
recurrence: recurrence coefficients of the classical continuous and discrete families,
numerically stable evaluation with derivatives, Gauss quadrature rules and conversions
to monomial and three-term encodings.

An orthonormal family wrt a measure is represented by its [recurrence coefficients](RecurrenceCoefficients)
`(alpha_n, beta_n)` such that `beta_{n+1} p_{n+1}(x) = (x - alpha_n) p_n(x) - beta_n p_{n-1}(x)`.

Example:
```
use uqbox_poly::{evaluate, gauss_quadrature, recurrence_coefficients, PolynomialFamily};
use ndarray::Array;

// Legendre polynomials orthonormal wrt the uniform probability on [-1, 1]
let legendre = PolynomialFamily::Jacobi { alpha: 0., beta: 0., probability: true };
let ab = recurrence_coefficients(&legendre, 10).unwrap();

// values of p_0..p_5 at 11 points, a (11, 6) matrix
let x = Array::linspace(-1., 1., 11);
let values = evaluate(&x, 5, &ab).unwrap();
assert_eq!(values.dim(), (11, 6));

// 5-point Gauss-Legendre rule
let (nodes, weights) = gauss_quadrature(&ab, 5).unwrap();
assert_eq!(nodes.len(), 5);
assert!((weights.sum() - 1.).abs() < 1e-12);
```

Families available:
* continuous: [Hermite](crate::hermite_recurrence), [Jacobi](crate::jacobi_recurrence)
* discrete: [Charlier](crate::charlier_recurrence), [Krawtchouk](crate::krawtchouk_recurrence),
  [Hahn](crate::hahn_recurrence), [discrete Chebyshev](crate::discrete_chebyshev_recurrence)
* any finite discrete measure with the [Stieltjes procedure](crate::discrete_stieltjes_recurrence)

*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod conversion;
mod errors;
mod evaluate;
mod quadrature;
mod recurrence;

pub use conversion::*;
pub use errors::*;
pub use evaluate::*;
pub use quadrature::*;
pub use recurrence::*;
