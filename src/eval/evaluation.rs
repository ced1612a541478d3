//! Multi-class classification metrics over a confusion matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;

/// Confusion matrix plus the metrics derived from it.
///
/// `confusion[actual][predicted]` counts samples of class `actual` that were
/// predicted as `predicted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    num_classes: usize,
    confusion: Vec<Vec<usize>>,
}

impl Evaluation {
    pub fn new(num_classes: usize) -> Evaluation {
        Evaluation {
            num_classes,
            confusion: vec![vec![0; num_classes]; num_classes],
        }
    }

    /// Accumulates one batch: `labels` are one-hot rows, `predictions` are
    /// per-class scores; both classes are taken by arg-max.
    pub fn eval(&mut self, labels: &Matrix, predictions: &Matrix) {
        assert_eq!(labels.rows, predictions.rows, "labels and predictions must have equal length");
        let actual: Vec<usize> = labels.data.iter().map(|row| argmax(row)).collect();
        let predicted: Vec<usize> = predictions.data.iter().map(|row| argmax(row)).collect();
        self.eval_classes(&actual, &predicted);
    }

    /// Accumulates already-decoded class indices.
    pub fn eval_classes(&mut self, actual: &[usize], predicted: &[usize]) {
        assert_eq!(actual.len(), predicted.len(), "actual and predicted must have equal length");
        for (&a, &p) in actual.iter().zip(predicted) {
            assert!(a < self.num_classes && p < self.num_classes, "class index out of range");
            self.confusion[a][p] += 1;
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn confusion_matrix(&self) -> &[Vec<usize>] {
        &self.confusion
    }

    pub fn total(&self) -> usize {
        self.confusion.iter().flatten().sum()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.confusion[class][class]
    }

    /// Samples predicted as `class` that belong elsewhere.
    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.num_classes)
            .filter(|&a| a != class)
            .map(|a| self.confusion[a][class])
            .sum()
    }

    /// Samples of `class` predicted as something else.
    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.num_classes)
            .filter(|&p| p != class)
            .map(|p| self.confusion[class][p])
            .sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.num_classes).map(|c| self.true_positives(c)).sum();
        correct as f64 / total as f64
    }

    /// `None` if nothing was predicted as `class`.
    pub fn class_precision(&self, class: usize) -> Option<f64> {
        ratio(self.true_positives(class), self.true_positives(class) + self.false_positives(class))
    }

    /// `None` if no sample of `class` was seen.
    pub fn class_recall(&self, class: usize) -> Option<f64> {
        ratio(self.true_positives(class), self.true_positives(class) + self.false_negatives(class))
    }

    /// Harmonic mean of precision and recall; undefined terms count as 0.
    pub fn class_f1(&self, class: usize) -> f64 {
        let p = self.class_precision(class).unwrap_or(0.0);
        let r = self.class_recall(class).unwrap_or(0.0);
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }

    /// Macro average over the classes where precision is defined.
    pub fn precision(&self) -> f64 {
        mean((0..self.num_classes).filter_map(|c| self.class_precision(c)))
    }

    /// Macro average over the classes where recall is defined.
    pub fn recall(&self) -> f64 {
        mean((0..self.num_classes).filter_map(|c| self.class_recall(c)))
    }

    /// Macro average of per-class F1 over the classes that occur in the
    /// labels or the predictions.
    pub fn f1(&self) -> f64 {
        mean((0..self.num_classes)
            .filter(|&c| self.class_precision(c).is_some() || self.class_recall(c).is_some())
            .map(|c| self.class_f1(c)))
    }

    /// Human-readable report: summary metrics, a per-class table and the
    /// confusion matrix.
    pub fn stats(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{:=^66}", "Evaluation Metrics")?;
        writeln!(f, " # of classes:    {}", self.num_classes)?;
        writeln!(f, " Accuracy:        {:.4}", self.accuracy())?;
        writeln!(f, " Precision:       {:.4}", self.precision())?;
        writeln!(f, " Recall:          {:.4}", self.recall())?;
        writeln!(f, " F1 Score:        {:.4}", self.f1())?;
        writeln!(
            f,
            "Precision, recall & F1: macro-averaged (equally weighted avg. of {} classes)",
            self.num_classes
        )?;

        writeln!(f, "\n{:=^66}", "Per-Class Metrics")?;
        writeln!(f, " {:>5}  {:>9}  {:>9}  {:>9}  {:>7}", "Class", "Precision", "Recall", "F1", "Support")?;
        for c in 0..self.num_classes {
            let support: usize = self.confusion[c].iter().sum();
            writeln!(
                f,
                " {:>5}  {:>9}  {:>9}  {:>9.4}  {:>7}",
                c,
                fmt_metric(self.class_precision(c)),
                fmt_metric(self.class_recall(c)),
                self.class_f1(c),
                support
            )?;
        }

        let width = self
            .confusion
            .iter()
            .flatten()
            .map(|v| v.to_string().len())
            .chain(std::iter::once(self.num_classes.to_string().len()))
            .max()
            .unwrap_or(1)
            + 2;
        writeln!(f, "\n{:=^66}", "Confusion Matrix")?;
        let header: String = (0..self.num_classes).map(|c| format!("{c:>width$}")).collect();
        writeln!(f, "{header}")?;
        writeln!(f, "{}", "-".repeat(header.len()))?;
        for (actual, row) in self.confusion.iter().enumerate() {
            let cells: String = row.iter().map(|v| format!("{v:>width$}")).collect();
            writeln!(f, "{cells} | {actual} = {actual}")?;
        }
        writeln!(f, "\nConfusion matrix format: Actual (rowClass) predicted as (columnClass) N times")?;
        write!(f, "{}", "=".repeat(66))
    }
}

/// Index of the largest value; ties resolve to the lowest index.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 { None } else { Some(num as f64 / den as f64) }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Evaluation {
        // actual:    0 0 0 1 1 2 2 2
        // predicted: 0 0 1 1 1 2 2 0
        let mut eval = Evaluation::new(3);
        eval.eval_classes(&[0, 0, 0, 1, 1, 2, 2, 2], &[0, 0, 1, 1, 1, 2, 2, 0]);
        eval
    }

    #[test]
    fn confusion_counts_actual_by_predicted() {
        let eval = sample();
        assert_eq!(eval.confusion_matrix(), &[vec![2, 1, 0], vec![0, 2, 0], vec![1, 0, 2]]);
        assert_eq!(eval.total(), 8);
        assert_eq!((eval.true_positives(0), eval.false_positives(0), eval.false_negatives(0)), (2, 1, 1));
    }

    #[test]
    fn metrics_match_hand_computation() {
        let eval = sample();
        assert_relative_eq!(eval.accuracy(), 6.0 / 8.0);
        assert_relative_eq!(eval.class_precision(1).unwrap(), 2.0 / 3.0);
        assert_relative_eq!(eval.class_recall(2).unwrap(), 2.0 / 3.0);
        assert_relative_eq!(eval.class_f1(1), 0.8, epsilon = 1e-12);
        let macro_p = (2.0 / 3.0 + 2.0 / 3.0 + 1.0) / 3.0;
        assert_relative_eq!(eval.precision(), macro_p, epsilon = 1e-12);
    }

    #[test]
    fn never_predicted_class_is_left_out_of_macro_precision() {
        let mut eval = Evaluation::new(3);
        eval.eval_classes(&[0, 1, 2], &[0, 1, 1]);
        assert_eq!(eval.class_precision(2), None);
        assert_relative_eq!(eval.precision(), (1.0 + 0.5) / 2.0);
        assert_eq!(eval.class_f1(2), 0.0);
    }

    #[test]
    fn eval_decodes_one_hot_and_probabilities() {
        let labels = Matrix::from_data(vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]);
        let probs = Matrix::from_data(vec![vec![0.1, 0.7, 0.2], vec![0.5, 0.3, 0.2]]);
        let mut eval = Evaluation::new(3);
        eval.eval(&labels, &probs);
        assert_eq!(eval.confusion_matrix()[1][1], 1);
        assert_eq!(eval.confusion_matrix()[2][0], 1);
    }

    #[test]
    fn argmax_prefers_first_of_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn report_contains_headline_numbers_and_matrix() {
        let report = sample().stats();
        assert!(report.contains("# of classes:    3"));
        assert!(report.contains("Accuracy:        0.7500"));
        assert!(report.contains("  2  1  0 | 0 = 0"));
        assert!(report.contains("Actual (rowClass) predicted as (columnClass) N times"));
        assert!(report.ends_with(&"=".repeat(66)));
        assert_eq!(report, format!("{}", sample()));
    }

    #[test]
    fn empty_evaluation_reports_zeros() {
        let eval = Evaluation::new(3);
        assert_eq!(eval.accuracy(), 0.0);
        assert_eq!(eval.precision(), 0.0);
        assert_eq!(eval.f1(), 0.0);
    }
}
