// ============================================================
// Layer 5 — Adamax Optimizer
// ============================================================
// Adamax is the infinity-norm variant of Adam (Kingma & Ba 2015,
// §7.1): the second raw moment is replaced by an exponentially
// decayed running maximum of the gradient magnitude, so only the
// first moment needs bias correction:
//
//   m_t = β1·m_{t-1} + (1-β1)·g_t
//   u_t = max(β2·u_{t-1}, |g_t|)
//   θ_t = θ_{t-1} - lr / (1-β1^t) · m_t / (u_t + ε)
//
// Burn ships Adam, AdamW, and SGD but no Adamax, so the
// experiment's fifth variant is implemented here through Burn's
// SimpleOptimizer interface — per-tensor state, wrapped for
// module trees by OptimizerAdaptor exactly like the built-ins.

use burn::{
    config::Config,
    module::AutodiffModule,
    optim::{adaptor::OptimizerAdaptor, SimpleOptimizer},
    record::Record,
    tensor::{backend::AutodiffBackend, backend::Backend, Tensor},
    LearningRate,
};

#[derive(Config)]
pub struct AdamaxConfig {
    /// First-moment decay rate
    #[config(default = 0.9)]
    pub beta_1: f32,

    /// Infinity-norm decay rate
    #[config(default = 0.999)]
    pub beta_2: f32,

    /// Added to the infinity norm before dividing
    #[config(default = 1e-8)]
    pub epsilon: f32,
}

impl AdamaxConfig {
    pub fn init<B: AutodiffBackend, M: AutodiffModule<B>>(
        &self,
    ) -> OptimizerAdaptor<Adamax, M, B> {
        OptimizerAdaptor::from(Adamax {
            beta_1: self.beta_1,
            beta_2: self.beta_2,
            epsilon: self.epsilon,
        })
    }
}

/// The per-tensor update rule. State lives in AdamaxState.
#[derive(Clone)]
pub struct Adamax {
    beta_1: f32,
    beta_2: f32,
    epsilon: f32,
}

/// Optimizer state for one parameter tensor.
#[derive(Record, Clone)]
pub struct AdamaxState<B: Backend, const D: usize> {
    pub time: usize,
    pub moment_1: Tensor<B, D>,
    pub inf_norm: Tensor<B, D>,
}

impl<B: Backend> SimpleOptimizer<B> for Adamax {
    type State<const D: usize> = AdamaxState<B, D>;

    fn step<const D: usize>(
        &self,
        lr: LearningRate,
        tensor: Tensor<B, D>,
        grad: Tensor<B, D>,
        state: Option<Self::State<D>>,
    ) -> (Tensor<B, D>, Option<Self::State<D>>) {
        let (time, moment_1, inf_norm) = match state {
            Some(state) => (
                state.time + 1,
                state
                    .moment_1
                    .mul_scalar(self.beta_1)
                    .add(grad.clone().mul_scalar(1.0 - self.beta_1)),
                state.inf_norm.mul_scalar(self.beta_2).max_pair(grad.abs()),
            ),
            None => (
                1,
                grad.clone().mul_scalar(1.0 - self.beta_1),
                grad.abs(),
            ),
        };

        // Only the first moment is bias-corrected; the running
        // maximum is not an average and needs none.
        let bias_correction = 1.0 - self.beta_1.powi(time as i32) as f64;
        let step_size = lr / bias_correction;

        let delta = moment_1
            .clone()
            .div(inf_norm.clone().add_scalar(self.epsilon))
            .mul_scalar(step_size);

        (
            tensor.sub(delta),
            Some(AdamaxState {
                time,
                moment_1,
                inf_norm,
            }),
        )
    }

    fn to_device<const D: usize>(
        mut state: Self::State<D>,
        device: &B::Device,
    ) -> Self::State<D> {
        state.moment_1 = state.moment_1.to_device(device);
        state.inf_norm = state.inf_norm.to_device(device);
        state
    }
}
