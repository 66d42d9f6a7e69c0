pub mod geo;
pub mod time;

pub use geo::*;
pub use time::*;

/// Anything the traffic engine can count trips for.
///
/// `id` must match the station ids found in the trip feed.
pub trait Identifiable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl Identifiable for str {
    fn id(&self) -> &str {
        self
    }

    fn name(&self) -> &str {
        self
    }
}

impl Identifiable for String {
    fn id(&self) -> &str {
        self
    }

    fn name(&self) -> &str {
        self
    }
}
