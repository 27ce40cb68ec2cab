//! Variable classification and the index maps derived from it.
//!
//! # Coordinate systems
//!
//! ```text
//! jacobian columns   [ backward (nb) | current (nc) | forward (nf) | exogenous (nx) ]
//! pencil unknowns    x_t = [ y^b_{t-1} (nb) ; y^f_t (nf) ]
//! pencil rows        [ dynamic equations (n - ns) | links for forward-and-backward (nboth) ]
//! ```
//!
//! The pencil is `D x_{t+1} = E x_t`. A current variable that is also
//! backward is the leading part of `x_{t+1}` and its current coefficients
//! land in `D`; a current variable that is only forward is part of `x_t`
//! and its (negated) current coefficients land in `E`.

use std::ops::Range;

use crate::error::LreError;

/// Role of one Jacobian column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Coefficient on `y_{t-1}` of the given variable.
    Backward(usize),
    /// Coefficient on `y_t` of the given variable.
    Current(usize),
    /// Coefficient on `y_{t+1}` of the given variable.
    Forward(usize),
    /// Coefficient on the given exogenous variable at `t`.
    Exogenous(usize),
}

/// Frozen classification of the endogenous variables of one model.
///
/// Built once by [`build_indices`]; every vector is sorted ascending and
/// every variable is a 0-based position in `0..n_endogenous`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LreIndices {
    n_endogenous: usize,
    n_exogenous: usize,
    forward: Vec<usize>,
    current: Vec<usize>,
    backward: Vec<usize>,
    statics: Vec<usize>,
    both: Vec<usize>,
    purely_forward: Vec<usize>,
    non_backward: Vec<usize>,
    dynamic: Vec<usize>,
    current_dynamic: Vec<usize>,
    column_roles: Vec<ColumnRole>,
    static_columns: Vec<usize>,
    current_dynamic_columns: Vec<usize>,
    purely_forward_positions: Vec<usize>,
    d_columns: Vec<(usize, usize)>,
    e_columns: Vec<(usize, usize)>,
    ud_columns: Vec<usize>,
    ue_columns: Vec<usize>,
}

/// Builds the classification from caller-supplied role sets.
///
/// Inputs need not be sorted and may contain duplicates. `n_endogenous` is
/// one more than the largest index in `forward ∪ current ∪ backward`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LreError::EmptyClassification`] | `forward`, `current`, `backward` all empty |
/// | [`LreError::UnclassifiedVariable`] | an index below `n_endogenous` has no role |
/// | [`LreError::StaticNotCurrent`] | a static variable is not current |
/// | [`LreError::StaticInDynamicRole`] | a static variable is forward or backward |
/// | [`LreError::UndeclaredStatic`] | a current-only variable is not static |
///
/// # Example
///
/// ```
/// use lre_solver::build_indices;
///
/// let idx = build_indices(1, &[0], &[0, 1, 2, 3], &[1], &[2, 3]).unwrap();
/// assert_eq!(idx.n_endogenous(), 4);
/// assert_eq!(idx.non_backward(), &[0, 2, 3]);
/// assert_eq!(idx.dynamic(), &[0, 1]);
/// ```
pub fn build_indices(
    n_exogenous: usize,
    forward: &[usize],
    current: &[usize],
    backward: &[usize],
    statics: &[usize],
) -> Result<LreIndices, LreError> {
    let forward = sorted_unique(forward);
    let current = sorted_unique(current);
    let backward = sorted_unique(backward);
    let statics = sorted_unique(statics);

    let n = forward
        .iter()
        .chain(&current)
        .chain(&backward)
        .max()
        .map(|&m| m + 1)
        .ok_or(LreError::EmptyClassification)?;

    let mut is_forward = vec![false; n];
    let mut is_current = vec![false; n];
    let mut is_backward = vec![false; n];
    forward.iter().for_each(|&v| is_forward[v] = true);
    current.iter().for_each(|&v| is_current[v] = true);
    backward.iter().for_each(|&v| is_backward[v] = true);

    let mut is_static = vec![false; n];
    for &v in &statics {
        if v >= n || !is_current[v] {
            return Err(LreError::StaticNotCurrent { variable: v });
        }
        if is_forward[v] || is_backward[v] {
            return Err(LreError::StaticInDynamicRole { variable: v });
        }
        is_static[v] = true;
    }
    for v in 0..n {
        if !(is_forward[v] || is_current[v] || is_backward[v]) {
            return Err(LreError::UnclassifiedVariable { variable: v });
        }
        if !(is_forward[v] || is_backward[v] || is_static[v]) {
            return Err(LreError::UndeclaredStatic { variable: v });
        }
    }

    let both: Vec<usize> = forward.iter().copied().filter(|&v| is_backward[v]).collect();
    let purely_forward: Vec<usize> = forward.iter().copied().filter(|&v| !is_backward[v]).collect();
    let mut non_backward: Vec<usize> = statics.iter().chain(&purely_forward).copied().collect();
    non_backward.sort_unstable();
    let dynamic: Vec<usize> = (0..n).filter(|&v| !is_static[v]).collect();
    let current_dynamic: Vec<usize> = current.iter().copied().filter(|&v| !is_static[v]).collect();

    let nb = backward.len();
    let nc = current.len();

    let position = |set: &[usize]| {
        let mut pos = vec![usize::MAX; n];
        for (k, &v) in set.iter().enumerate() {
            pos[v] = k;
        }
        pos
    };
    let pos_forward = position(&forward);
    let pos_current = position(&current);
    let pos_backward = position(&backward);

    let column_roles: Vec<ColumnRole> = backward
        .iter()
        .map(|&v| ColumnRole::Backward(v))
        .chain(current.iter().map(|&v| ColumnRole::Current(v)))
        .chain(forward.iter().map(|&v| ColumnRole::Forward(v)))
        .chain((0..n_exogenous).map(ColumnRole::Exogenous))
        .collect();

    let static_columns = statics.iter().map(|&v| nb + pos_current[v]).collect();
    let current_dynamic_columns = current_dynamic.iter().map(|&v| nb + pos_current[v]).collect();
    let purely_forward_positions = purely_forward.iter().map(|&v| pos_forward[v]).collect();

    let mut d_columns = Vec::with_capacity(nb + forward.len());
    let mut e_columns = Vec::with_capacity(nb + forward.len());
    for &v in &current_dynamic {
        if is_backward[v] {
            d_columns.push((pos_backward[v], nb + pos_current[v]));
        } else {
            e_columns.push((nb + pos_forward[v], nb + pos_current[v]));
        }
    }
    for k in 0..forward.len() {
        d_columns.push((nb + k, nb + nc + k));
    }
    for k in 0..nb {
        e_columns.push((k, k));
    }
    let ud_columns = both.iter().map(|&v| pos_backward[v]).collect();
    let ue_columns = both.iter().map(|&v| nb + pos_forward[v]).collect();

    Ok(LreIndices {
        n_endogenous: n,
        n_exogenous,
        forward,
        current,
        backward,
        statics,
        both,
        purely_forward,
        non_backward,
        dynamic,
        current_dynamic,
        column_roles,
        static_columns,
        current_dynamic_columns,
        purely_forward_positions,
        d_columns,
        e_columns,
        ud_columns,
        ue_columns,
    })
}

fn sorted_unique(v: &[usize]) -> Vec<usize> {
    let mut out = v.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

impl LreIndices {
    pub fn n_endogenous(&self) -> usize {
        self.n_endogenous
    }

    pub fn n_exogenous(&self) -> usize {
        self.n_exogenous
    }

    pub fn n_forward(&self) -> usize {
        self.forward.len()
    }

    pub fn n_current(&self) -> usize {
        self.current.len()
    }

    pub fn n_backward(&self) -> usize {
        self.backward.len()
    }

    pub fn n_static(&self) -> usize {
        self.statics.len()
    }

    pub fn n_both(&self) -> usize {
        self.both.len()
    }

    /// Order of the reduced pencil, `n_forward + n_backward`.
    pub fn n_dynamic_system(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    /// Columns of the Jacobian: `n_backward + n_current + n_forward + n_exogenous`.
    pub fn n_jacobian_columns(&self) -> usize {
        self.column_roles.len()
    }

    pub fn forward(&self) -> &[usize] {
        &self.forward
    }

    pub fn current(&self) -> &[usize] {
        &self.current
    }

    pub fn backward(&self) -> &[usize] {
        &self.backward
    }

    pub fn statics(&self) -> &[usize] {
        &self.statics
    }

    /// `forward ∩ backward`.
    pub fn both(&self) -> &[usize] {
        &self.both
    }

    /// `forward \ backward`.
    pub fn purely_forward(&self) -> &[usize] {
        &self.purely_forward
    }

    /// `statics ∪ purely_forward`, sorted.
    pub fn non_backward(&self) -> &[usize] {
        &self.non_backward
    }

    /// Every variable that is not static.
    pub fn dynamic(&self) -> &[usize] {
        &self.dynamic
    }

    /// `current \ statics`.
    pub fn current_dynamic(&self) -> &[usize] {
        &self.current_dynamic
    }

    /// Role of every Jacobian column, in column order.
    pub fn column_roles(&self) -> &[ColumnRole] {
        &self.column_roles
    }

    pub fn backward_columns(&self) -> Range<usize> {
        0..self.backward.len()
    }

    pub fn current_columns(&self) -> Range<usize> {
        let start = self.backward.len();
        start..start + self.current.len()
    }

    pub fn forward_columns(&self) -> Range<usize> {
        let start = self.backward.len() + self.current.len();
        start..start + self.forward.len()
    }

    pub fn exogenous_columns(&self) -> Range<usize> {
        let start = self.backward.len() + self.current.len() + self.forward.len();
        start..start + self.n_exogenous
    }

    /// Jacobian columns of the static variables' current coefficients, in
    /// the order of [`LreIndices::statics`].
    pub fn static_columns(&self) -> &[usize] {
        &self.static_columns
    }

    /// Jacobian columns of [`LreIndices::current_dynamic`].
    pub fn current_dynamic_columns(&self) -> &[usize] {
        &self.current_dynamic_columns
    }

    /// Position in [`LreIndices::forward`] of each purely forward variable.
    pub fn purely_forward_positions(&self) -> &[usize] {
        &self.purely_forward_positions
    }

    /// `(pencil column, jacobian column)` pairs copied into `D`.
    pub fn d_columns(&self) -> &[(usize, usize)] {
        &self.d_columns
    }

    /// `(pencil column, jacobian column)` pairs copied, negated, into `E`.
    pub fn e_columns(&self) -> &[(usize, usize)] {
        &self.e_columns
    }

    /// `D` column set to one in each link row.
    pub fn ud_columns(&self) -> &[usize] {
        &self.ud_columns
    }

    /// `E` column set to one in each link row.
    pub fn ue_columns(&self) -> &[usize] {
        &self.ue_columns
    }
}
