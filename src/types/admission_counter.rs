//! Hint counter of announced-but-unclaimed pipelines.

/// Counts `new pipeline` announcements not yet matched by a claim.
///
/// Unset until the first announcement or claim. It only decides whether to ask the
/// router; the router's reply is what says whether a pipeline exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionCounter {
  pending: Option<i64>,
}

impl AdmissionCounter {
  pub fn new() -> Self {
    Self::default()
  }

  /// A `new pipeline` announcement arrived.
  pub fn announce(&mut self) {
    self.pending = Some(self.pending.unwrap_or(0) + 1);
  }

  /// A claim returned a pipeline. An unset counter becomes 0.
  pub fn claimed(&mut self) {
    self.pending = Some(match self.pending {
      None => 0,
      Some(n) => n - 1,
    });
  }

  /// A claim found nothing: whatever was announced has been taken elsewhere.
  pub fn reset(&mut self) {
    self.pending = Some(0);
  }

  pub fn has_pending(&self) -> bool {
    self.pending.is_some_and(|n| n > 0)
  }

  pub fn value(&self) -> Option<i64> {
    self.pending
  }
}
