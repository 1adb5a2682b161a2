//! DFA to regular expression translation by state elimination. The
//! produced syntax uses `+` for alternation, juxtaposition for
//! concatenation, `*` for iteration and `ε` for the empty string; it is a
//! description of the language, not input for the regex compiler (whose
//! surface syntax differs).

use crate::dfa::{Dfa, DfaError};

impl Dfa {
    /// Generates a regular expression for the language of this DFA, as
    /// the alternation over all accepting states `f` of `R[q0][f]`, where
    /// the matrix `R` is rewritten once per state `k` with
    /// `R'[i][j] = R[i][j] + R[i][k]R[k][k]*R[k][j]`.
    pub fn to_regex(&self) -> Result<String, DfaError> {
        let start = self.initial.ok_or(DfaError::MissingInitialState)?;
        let n = self.states.len();

        let mut matrix = vec![vec![String::new(); n]; n];
        for (i, state) in self.states.iter().enumerate() {
            for j in 0..n {
                let entry = &mut matrix[i][j];
                if i == j {
                    entry.push('ε');
                    for (letter_idx, transition) in state.transitions.iter().enumerate() {
                        if *transition == Some(i) {
                            entry.push('+');
                            entry.push(self.alphabet[letter_idx]);
                        }
                    }
                } else {
                    for (letter_idx, transition) in state.transitions.iter().enumerate() {
                        if *transition == Some(j) {
                            if !entry.is_empty() {
                                entry.push('+');
                            }
                            entry.push(self.alphabet[letter_idx]);
                        }
                    }
                }
            }
        }

        for k in 0..n {
            let mut rewritten = vec![vec![String::new(); n]; n];
            for i in 0..n {
                for j in 0..n {
                    rewritten[i][j] = compose(&matrix, i, j, k);
                }
            }
            matrix = rewritten;
        }

        let mut regex = String::new();
        for (idx, state) in self.states.iter().enumerate() {
            if state.accepting {
                if !regex.is_empty() {
                    regex.push('+');
                }
                regex.push_str(&matrix[start][idx]);
            }
        }
        Ok(regex)
    }
}

/// One cell of the elimination step: `R[i][j] + R[i][k]R[k][k]*R[k][j]`,
/// where an empty operand among the right-hand triple removes the whole
/// triple, and multi-character operands get parenthesised
fn compose(matrix: &[Vec<String>], i: usize, j: usize, k: usize) -> String {
    let r_ij = &matrix[i][j];
    let r_ik = parenthesized(&matrix[i][k]);
    let r_kk = parenthesized(&matrix[k][k]);
    let r_kj = parenthesized(&matrix[k][j]);

    if r_ik.is_empty() || r_kk.is_empty() || r_kj.is_empty() {
        return r_ij.clone();
    }
    let triple = format!("{r_ik}{r_kk}*{r_kj}");
    if r_ij.is_empty() {
        triple
    } else {
        format!("{r_ij}+{triple}")
    }
}

fn parenthesized(operand: &str) -> String {
    if operand.chars().count() > 1 {
        format!("({operand})")
    } else {
        operand.to_string()
    }
}
