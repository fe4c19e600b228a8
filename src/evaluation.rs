use std::{collections::BTreeMap, fmt::Display, iter::zip};

use crate::{dataset::Corpus, tagger::Tagger};

/// Label-wise performance values.
#[derive(Debug, Default, Clone)]
pub struct LabelMeasure {
    /// Number of correct predictions.
    pub num_correct: usize,
    /** Number of occurrences of the label in the gold-standard data. */
    pub num_observation: usize,
    /** Number of predictions. */
    pub num_prediction: usize,
    pub precision: f64,
    pub recall: f64,
    /** F1 score. */
    pub fmeasure: f64,
}

impl LabelMeasure {
    fn update(&mut self) {
        self.precision = ratio(self.num_correct, self.num_prediction);
        self.recall = ratio(self.num_correct, self.num_observation);
        self.fmeasure = if self.precision + self.recall > 0.0 {
            self.precision * self.recall * 2.0 / (self.precision + self.recall)
        } else {
            0.0
        };
    }
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

/// An overall performance values.
#[derive(Debug, Default, Clone)]
pub struct Evaluation {
    /** Number of labels occurring in the gold-standard data. */
    pub num_labels: usize,
    tbl: BTreeMap<String, LabelMeasure>,

    /** Number of correctly predicted items. */
    item_total_correct: usize,
    /** Total number of items. */
    item_total_num: usize,
    item_accuracy: f64,

    /** Number of correctly tagged sentences. */
    inst_total_correct: usize,
    inst_total_num: usize,
    inst_accuracy: f64,

    /** Items whose token has no statistics of its own in the model. */
    unknown_total_correct: usize,
    unknown_total_num: usize,
    unknown_accuracy: f64,

    macro_precision: f64,
    macro_recall: f64,
    macro_fmeasure: f64,
}

/// Summary returned by [`Evaluation::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimation {
    pub item_accuracy: f64,
    pub sentence_accuracy: f64,
    pub unknown_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Evaluation {
    /// Adds one sentence. `known[i]` tells whether token `i` is known to the
    /// model; positions past its end count as known.
    pub fn accumulate<R: AsRef<str>, P: AsRef<str>>(&mut self, reference: &[R], prediction: &[P], known: &[bool]) {
        let mut matched = 0;
        for (i, (r, p)) in zip(reference, prediction).enumerate() {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            let correct = r == p;
            if correct {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            if !known.get(i).copied().unwrap_or(true) {
                self.unknown_total_num += 1;
                if correct {
                    self.unknown_total_correct += 1;
                }
            }
            self.item_total_num += 1;
        }
        self.item_total_correct += matched;

        if matched == reference.len() && reference.len() == prediction.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    pub fn evaluate(&mut self) -> Estimation {
        self.num_labels = 0;
        self.macro_precision = 0.0;
        self.macro_recall = 0.0;
        self.macro_fmeasure = 0.0;
        for lev in self.tbl.values_mut() {
            lev.update();
            if lev.num_observation == 0 {
                continue;
            }
            self.num_labels += 1;
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }
        if self.num_labels > 0 {
            self.macro_precision /= self.num_labels as f64;
            self.macro_recall /= self.num_labels as f64;
            self.macro_fmeasure /= self.num_labels as f64;
        }

        self.item_accuracy = ratio(self.item_total_correct, self.item_total_num);
        self.inst_accuracy = ratio(self.inst_total_correct, self.inst_total_num);
        self.unknown_accuracy = ratio(self.unknown_total_correct, self.unknown_total_num);
        self.estimation()
    }

    pub fn estimation(&self) -> Estimation {
        Estimation {
            item_accuracy: self.item_accuracy,
            sentence_accuracy: self.inst_accuracy,
            unknown_accuracy: self.unknown_accuracy,
            precision: self.macro_precision,
            recall: self.macro_recall,
            fmeasure: self.macro_fmeasure,
        }
    }

    pub fn label(&self, label: &str) -> Option<&LabelMeasure> {
        self.tbl.get(label)
    }

    pub fn num_items(&self) -> usize {
        self.item_total_num
    }

    pub fn num_unknown(&self) -> usize {
        self.unknown_total_num
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, lev) in &self.tbl {
            let label = if label.is_empty() { "<none>" } else { label };
            if lev.num_observation == 0 {
                writeln!(f, "\t{}: ({}, {}, {}) (******, ******, ******)", label, lev.num_correct, lev.num_prediction, lev.num_observation)?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation, lev.precision, lev.recall, lev.fmeasure
                )?;
            }
        }
        writeln!(f, "Macro-average precision, recall, F1: ({:.4}, {:.4}, {:.4})", self.macro_precision, self.macro_recall, self.macro_fmeasure)?;
        writeln!(f, "Item accuracy: {}/{} => {:.4}", self.item_total_correct, self.item_total_num, self.item_accuracy)?;
        writeln!(f, "Unknown token accuracy: {}/{} => {:.4}", self.unknown_total_correct, self.unknown_total_num, self.unknown_accuracy)?;
        writeln!(f, "Sequence accuracy: {}/{} => {:.4}", self.inst_total_correct, self.inst_total_num, self.inst_accuracy)
    }
}

/// Tags every sentence of `corpus` and scores the result against its tags.
pub fn evaluate_corpus<T: Tagger>(tagger: &T, corpus: &Corpus) -> Evaluation {
    let mut eval = Evaluation::default();
    for sentence in corpus {
        let prediction = tagger.decode(sentence.tokens());
        let known: Vec<bool> = sentence.tokens().iter().map(|t| tagger.is_known(t)).collect();
        eval.accumulate(sentence.tags(), prediction.as_slice(), &known);
    }
    eval.evaluate();
    eval
}
