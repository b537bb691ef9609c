//! External routing capabilities the pipeline depends on.
//!
//! Coordinates are `(longitude, latitude)` pairs, the order routing services
//! expect. Implementations report any unusable response as a
//! [`ProviderError`]; they must not panic.

use crate::error::ProviderError;
use crate::route::FullRoute;

/// Provides a travel-duration matrix for a set of locations.
///
/// The matrix is indexed by the provided location order. An empty input
/// yields an empty matrix, not an error.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, coordinates: &[(f64, f64)]) -> Result<Vec<Vec<f64>>, ProviderError>;
}

/// Provides driving directions through an ordered sequence of stops.
///
/// The returned route must carry one segment per consecutive stop pair.
pub trait DirectionsProvider {
    fn directions_for(&self, coordinates: &[(f64, f64)]) -> Result<FullRoute, ProviderError>;
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &T {
    fn matrix_for(&self, coordinates: &[(f64, f64)]) -> Result<Vec<Vec<f64>>, ProviderError> {
        (**self).matrix_for(coordinates)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn directions_for(&self, coordinates: &[(f64, f64)]) -> Result<FullRoute, ProviderError> {
        (**self).directions_for(coordinates)
    }
}
