pub mod lexicon;

pub use lexicon::*;

use std::borrow::Cow;

type Predicate<T> = Box<dyn Fn(&T) -> usize + Send + Sync>;

/// One weighted piece of evidence.
pub struct Signal<T: ?Sized> {
    pub name: Cow<'static, str>,
    pub weight: f64,
    predicate: Predicate<T>,
}

impl<T: ?Sized> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Result of scoring one input
#[derive(Debug, Clone, PartialEq)]
pub struct SignalScore {
    /// Base plus weighted hits, clamped to `[floor, ceiling]`
    pub value: f64,
    /// Names of the signals that contributed, in evaluation order
    pub fired: Vec<Cow<'static, str>>,
    /// Whether `value` reached the threshold
    pub passed: bool,
}

impl SignalScore {
    pub fn fired(&self, name: &str) -> bool {
        self.fired.iter().any(|n| n == name)
    }
}

/// Ordered list of `(predicate, weight)` pairs summed onto a base value,
/// clamped and compared against a threshold.
///
/// Used for turn-boundary confidence, fragment evidence and detector
/// confidence. Boolean signals count once; counted signals add their weight
/// once per hit, so "+0.1 per keyword" is a single counted signal.
#[derive(Debug)]
pub struct WeightedSignals<T: ?Sized> {
    signals: Vec<Signal<T>>,
    base: f64,
    floor: f64,
    ceiling: f64,
    threshold: f64,
}

impl<T: ?Sized> WeightedSignals<T> {
    pub fn new(threshold: f64) -> Self {
        Self {
            signals: Vec::new(),
            base: 0.0,
            floor: 0.0,
            ceiling: 1.0,
            threshold,
        }
    }

    pub fn with_base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    pub fn with_bounds(mut self, floor: f64, ceiling: f64) -> Self {
        self.floor = floor;
        self.ceiling = ceiling;
        self
    }

    /// Add a signal that contributes `weight` when `predicate` holds.
    pub fn signal<F>(mut self, name: impl Into<Cow<'static, str>>, weight: f64, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.signals.push(Signal {
            name: name.into(),
            weight,
            predicate: Box::new(move |input| usize::from(predicate(input))),
        });
        self
    }

    /// Add a signal that contributes `weight` per hit.
    pub fn counted<F>(mut self, name: impl Into<Cow<'static, str>>, weight: f64, predicate: F) -> Self
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        self.signals.push(Signal {
            name: name.into(),
            weight,
            predicate: Box::new(predicate),
        });
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn score(&self, input: &T) -> SignalScore {
        let mut value = self.base;
        let mut fired = Vec::new();

        for signal in &self.signals {
            let hits = (signal.predicate)(input);
            if hits > 0 {
                value += signal.weight * hits as f64;
                fired.push(signal.name.clone());
            }
        }

        let value = value.clamp(self.floor, self.ceiling);
        SignalScore {
            value,
            passed: value >= self.threshold,
            fired,
        }
    }
}
