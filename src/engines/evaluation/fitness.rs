use super::targets::TargetSet;
use crate::engines::generation::Genome;
use crate::error::Result;
use crate::render::Renderer;
use crate::types::Viewpoint;

/// Anything that scores a genome.
pub trait FitnessFunction {
    fn evaluate(&mut self, genome: &Genome) -> Result<f64>;
}

impl<F> FitnessFunction for F
where
    F: FnMut(&Genome) -> Result<f64>,
{
    fn evaluate(&mut self, genome: &Genome) -> Result<f64> {
        self(genome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewScore {
    pub viewpoint: Viewpoint,
    pub match_score: f64,
    pub mismatch_score: f64,
    pub score: f64,
}

/// Renders a genome at every target viewpoint and compares each frame with
/// its mask pair.
///
/// Per view: `match - mismatch * penalty_factor`, averaged over all views.
/// A perfect layout scores about 1.0 per view; ink leaking into the negative
/// region pushes the score below zero.
pub struct FitnessEvaluator<R: Renderer> {
    renderer: R,
    targets: TargetSet,
    penalty_factor: f64,
}

impl<R: Renderer> FitnessEvaluator<R> {
    pub fn new(renderer: R, targets: TargetSet, penalty_factor: f64) -> Self {
        Self {
            renderer,
            targets,
            penalty_factor,
        }
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn penalty_factor(&self) -> f64 {
        self.penalty_factor
    }

    /// Score every view. The first render or comparison failure aborts the
    /// evaluation.
    pub fn view_scores(&mut self, genome: &Genome) -> Result<Vec<ViewScore>> {
        self.renderer.set_configuration(genome);
        let mut scores = Vec::with_capacity(self.targets.len());
        for view in self.targets.views() {
            let frame = self.renderer.make_screenshot(view.viewpoint)?;
            let match_score = view.positive.score(&frame)?;
            let mismatch_score = view.negative.score(&frame)?;
            scores.push(ViewScore {
                viewpoint: view.viewpoint,
                match_score,
                mismatch_score,
                score: match_score - mismatch_score * self.penalty_factor,
            });
        }
        Ok(scores)
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

impl<R: Renderer> FitnessFunction for FitnessEvaluator<R> {
    fn evaluate(&mut self, genome: &Genome) -> Result<f64> {
        let scores = self.view_scores(genome)?;
        Ok(scores.iter().map(|s| s.score).sum::<f64>() / scores.len() as f64)
    }
}
