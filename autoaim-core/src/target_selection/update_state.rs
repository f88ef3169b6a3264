/// A snapshot of the currently-tracked robots and plates, captured on every
/// [`super::TargetSelector::update`] call so that `reselect` can re-run
/// selection against the same inputs without the caller re-supplying them.
#[derive(Clone)]
pub struct UpdateState<R, P> {
    pub robots: Vec<R>,
    pub plates: Vec<P>,
}

impl<R, P> UpdateState<R, P> {
    pub fn new(robots: Vec<R>, plates: Vec<P>) -> Self {
        UpdateState { robots, plates }
    }
}
