//! Contextual-bandit feedback consumed by `Tournament::learn`

/// One observed (cost, action, probability) triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CbClass {
    /// Observed cost of playing `action`
    pub cost: f32,
    /// Action id in `1..=num_leaves`
    pub action: u32,
    /// Probability with which `action` was sampled, in `(0, 1]`
    pub probability: f32,
}

impl CbClass {
    pub fn new(cost: f32, action: u32, probability: f32) -> Self {
        CbClass { cost, action, probability }
    }

    /// Inverse-propensity importance weight: `cost / probability`
    pub fn importance_weight(&self) -> f32 {
        self.cost / self.probability
    }
}

/// Feedback for one example; zero triples is a valid no-op label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CbLabel {
    pub costs: Vec<CbClass>,
}

impl CbLabel {
    pub fn new() -> Self {
        CbLabel::default()
    }

    /// Append a triple (builder style)
    pub fn with(mut self, cost: f32, action: u32, probability: f32) -> Self {
        self.costs.push(CbClass::new(cost, action, probability));
        self
    }

    pub fn push(&mut self, class: CbClass) {
        self.costs.push(class);
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn first(&self) -> Option<&CbClass> {
        self.costs.first()
    }

    pub fn last(&self) -> Option<&CbClass> {
        self.costs.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CbClass> {
        self.costs.iter()
    }
}

impl FromIterator<CbClass> for CbLabel {
    fn from_iter<I: IntoIterator<Item = CbClass>>(iter: I) -> Self {
        CbLabel { costs: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a CbLabel {
    type Item = &'a CbClass;
    type IntoIter = std::slice::Iter<'a, CbClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.costs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_weight() {
        assert_eq!(CbClass::new(3.5, 2, 0.5).importance_weight(), 7.0);
        assert_eq!(CbClass::new(0.0, 1, 0.25).importance_weight(), 0.0);
    }

    #[test]
    fn test_builder_keeps_order() {
        let label = CbLabel::new().with(1.0, 3, 0.5).with(2.0, 1, 1.0);
        assert_eq!(label.len(), 2);
        assert_eq!(label.first().map(|c| c.action), Some(3));
        assert_eq!(label.last().map(|c| c.action), Some(1));
    }

    #[test]
    fn test_collect() {
        let label: CbLabel = (1..=3).map(|a| CbClass::new(1.0, a, 1.0)).collect();
        let actions: Vec<u32> = label.iter().map(|c| c.action).collect();
        assert_eq!(actions, vec![1, 2, 3]);
        assert!(CbLabel::new().is_empty());
    }
}
