use crate::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport, SolveStatus};
use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt, TerminationReason};
use nalgebra::{storage::Owned, DMatrix, DVector, Dyn};
use planar_calib_core::Real;

struct LmWrapper<'a, P: NllsProblem> {
    problem: &'a P,
    params: DVector<Real>,
}

impl<'a, P: NllsProblem> LeastSquaresProblem<Real, Dyn, Dyn> for LmWrapper<'a, P> {
    type ResidualStorage = Owned<Real, Dyn>;
    type JacobianStorage = Owned<Real, Dyn, Dyn>;
    type ParameterStorage = Owned<Real, Dyn>;

    fn set_params(&mut self, x: &DVector<Real>) {
        self.params.clone_from(x);
    }

    fn params(&self) -> DVector<Real> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<Real>> {
        Some(self.problem.residuals(&self.params))
    }

    fn jacobian(&self) -> Option<DMatrix<Real>> {
        Some(self.problem.jacobian(&self.params))
    }
}

fn status_of(termination: &TerminationReason) -> SolveStatus {
    match termination {
        TerminationReason::ResidualsZero
        | TerminationReason::Orthogonal
        | TerminationReason::Converged { .. } => SolveStatus::Converged,
        TerminationReason::NoImprovementPossible(_) => SolveStatus::Stalled,
        TerminationReason::LostPatience => SolveStatus::BudgetExhausted,
        TerminationReason::Numerical(_) | TerminationReason::User(_) => {
            SolveStatus::NumericalFailure
        }
        TerminationReason::NoParameters
        | TerminationReason::NoResiduals
        | TerminationReason::WrongDimensions(_) => SolveStatus::InvalidProblem,
    }
}

/// Levenberg–Marquardt backend (MINPACK port from the `levenberg-marquardt` crate).
#[derive(Debug, Default, Clone)]
pub struct LmBackend;

impl NllsSolverBackend for LmBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport) {
        let lm = LevenbergMarquardt::new()
            .with_ftol(opts.ftol)
            .with_xtol(opts.xtol)
            .with_gtol(opts.gtol)
            .with_patience(opts.max_iters.max(1));

        let initial_cost = 0.5 * problem.residuals(&x0).norm_squared();
        let wrapper = LmWrapper {
            problem,
            params: x0,
        };

        let (wrapper, report) = lm.minimize(wrapper);
        let x_opt = wrapper.params();

        let report = SolveReport {
            evaluations: report.number_of_evaluations,
            initial_cost,
            final_cost: report.objective_function,
            status: status_of(&report.termination),
            termination: format!("{:?}", report.termination),
        };
        if opts.verbose {
            log::info!(
                "lm: {:?} after {} evaluations, cost {:.6e} -> {:.6e} ({})",
                report.status,
                report.evaluations,
                report.initial_cost,
                report.final_cost,
                report.termination
            );
        } else {
            log::debug!(
                "lm: {:?} after {} evaluations, cost {:.6e}",
                report.status,
                report.evaluations,
                report.final_cost
            );
        }

        (x_opt, report)
    }
}
