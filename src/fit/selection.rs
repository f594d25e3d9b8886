//! Model selection (Flat vs Trend vs Trend+Weekly) using BIC with guardrails.
//!
//! The backend fits each enabled model and computes:
//! - SSE / RMSE
//! - BIC = n * ln(SSE/n) + k * ln(n)
//!
//! Selection rules:
//! 1. Exclude underdetermined models: require `n >= k + 1`
//! 2. Choose the model with minimum BIC
//! 3. If ΔBIC <= 2 between the best and a simpler model, pick the simpler model

use crate::domain::{ModelKind, ModelSpec};
use crate::error::AppError;
use crate::fit::forecaster::{fit_model, ModelFit};

/// A model must have at least one more observation than parameters.
const MIN_N_BUFFER: usize = 1;

/// Candidate order, simplest first; the prefer-simpler rule walks this.
const KIND_ORDER: [ModelKind; 3] = [ModelKind::Flat, ModelKind::Trend, ModelKind::TrendSeasonal];

/// Per-model diagnostics for reporting.
#[derive(Debug, Clone)]
pub struct FitDiag {
    pub kind: ModelKind,
    pub rmse: f64,
    pub bic: f64,
    pub chosen: bool,
}

/// Diagnostics for a whole selection run.
#[derive(Debug, Clone, Default)]
pub struct FitDiagnostics {
    pub fits: Vec<FitDiag>,
    /// Models that were skipped and why.
    pub skipped: Vec<(ModelKind, String)>,
}

/// Output of fitting + selection.
#[derive(Debug, Clone)]
pub struct FitSelection {
    pub best: ModelFit,
    fits: Vec<(ModelFit, f64)>,
    skipped: Vec<(ModelKind, String)>,
}

impl FitSelection {
    pub fn into_diagnostics(self) -> FitDiagnostics {
        let best_kind = self.best.kind;
        FitDiagnostics {
            fits: self
                .fits
                .iter()
                .map(|(fit, bic)| FitDiag {
                    kind: fit.kind,
                    rmse: fit.rmse,
                    bic: *bic,
                    chosen: fit.kind == best_kind,
                })
                .collect(),
            skipped: self.skipped,
        }
    }
}

/// Fit the enabled models and select the best one.
pub fn fit_and_select(spec: ModelSpec, ts: &[f64], ys: &[f64]) -> Result<FitSelection, AppError> {
    let n = ts.len();

    let kinds: Vec<ModelKind> = match spec {
        ModelSpec::Flat => vec![ModelKind::Flat],
        ModelSpec::Trend => vec![ModelKind::Trend],
        ModelSpec::Seasonal => vec![ModelKind::TrendSeasonal],
        ModelSpec::Auto => KIND_ORDER.to_vec(),
    };

    let mut fits: Vec<(ModelFit, f64)> = Vec::new();
    let mut skipped = Vec::new();

    for kind in kinds {
        let k = kind.param_count();
        if n < k + MIN_N_BUFFER {
            skipped.push((
                kind,
                format!("Underdetermined: n={n} < k+{MIN_N_BUFFER}={}", k + MIN_N_BUFFER),
            ));
            continue;
        }
        let fit = fit_model(kind, ts, ys)?;
        let bic = bic(n, fit.sse, k);
        fits.push((fit, bic));
    }

    if fits.is_empty() {
        return Err(AppError::insufficient_history(
            "Insufficient history to fit any model after guardrails.",
        ));
    }

    let best = select_by_bic(&fits).clone();

    Ok(FitSelection {
        best,
        fits,
        skipped,
    })
}

fn bic(n: usize, sse: f64, k: usize) -> f64 {
    let n_f = n as f64;
    let sse_per = (sse / n_f).max(1e-12);
    n_f * sse_per.ln() + (k as f64) * n_f.ln()
}

fn select_by_bic(fits: &[(ModelFit, f64)]) -> &ModelFit {
    let mut best = &fits[0];
    for f in &fits[1..] {
        if f.1 < best.1 {
            best = f;
        }
    }
    let best_bic = best.1;

    // Prefer simplicity if within 2 BIC points.
    //
    // We iterate in order of increasing complexity and pick the first fit that
    // is "close enough" to the best.
    for kind in KIND_ORDER {
        if let Some(f) = fits.iter().find(|(fit, _)| fit.kind == kind) {
            if f.1 <= best_bic + 2.0 {
                return &f.0;
            }
        }
    }

    &best.0
}
