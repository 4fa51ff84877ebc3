use std::cell::RefCell;
use std::rc::Rc;

use freya::{
    Activation, ActivationFunction, Error, Gradients, Layer, Linear, Loss, LossType, Matrix, MeanSquaredError, Model,
    ParametricLayer, PlainLayer, Result,
};

/// (call, payload) pairs in the order the model made them.
type CallLog = Rc<RefCell<Vec<(String, Matrix)>>>;

/// Wraps a `Linear`, logging every call and the gradient it hands back.
struct RecordingLinear {
    tag: &'static str,
    inner: Linear,
    log: CallLog,
}

impl ParametricLayer for RecordingLinear {
    fn name(&self) -> &str {
        self.tag
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.log.borrow_mut().push((format!("{}.forward", self.tag), input.clone()));
        self.inner.forward(input)
    }

    fn backward(&mut self, gradient: &Matrix) -> Result<Gradients> {
        let grads = self.inner.backward(gradient)?;
        self.log.borrow_mut().push((format!("{}.backward", self.tag), grads.input.clone()));
        Ok(grads)
    }

    fn optimize(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, learning_rate: f64) -> Result<()> {
        self.log.borrow_mut().push((format!("{}.optimize", self.tag), weights_grad.clone()));
        self.inner.optimize(weights_grad, biases_grad, learning_rate)
    }
}

/// Wraps a plain layer, logging the gradient it receives.
struct RecordingPlain {
    tag: &'static str,
    inner: Activation,
    log: CallLog,
}

impl PlainLayer for RecordingPlain {
    fn name(&self) -> &str {
        self.tag
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.log.borrow_mut().push((format!("{}.forward", self.tag), input.clone()));
        self.inner.forward(input)
    }

    fn backward(&mut self, gradient: &Matrix) -> Result<Matrix> {
        self.log.borrow_mut().push((format!("{}.backward", self.tag), gradient.clone()));
        self.inner.backward(gradient)
    }
}

/// Lets a test keep a handle on a layer after the model takes ownership.
struct SharedLinear(Rc<RefCell<Linear>>);

impl ParametricLayer for SharedLinear {
    fn name(&self) -> &str {
        "SharedLinear"
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.0.borrow_mut().forward(input)
    }

    fn backward(&mut self, gradient: &Matrix) -> Result<Gradients> {
        self.0.borrow_mut().backward(gradient)
    }

    fn optimize(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, learning_rate: f64) -> Result<()> {
        self.0.borrow_mut().optimize(weights_grad, biases_grad, learning_rate)
    }
}

fn m(rows: Vec<Vec<f64>>) -> Matrix {
    Matrix::from_rows(rows).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn first_linear() -> Linear {
    Linear::from_parameters(
        m(vec![vec![0.2, -0.4, 0.1], vec![0.5, 0.3, -0.2]]),
        m(vec![vec![0.1, 0.0, -0.1]]),
    )
    .unwrap()
}

fn second_linear() -> Linear {
    Linear::from_parameters(m(vec![vec![0.7], vec![-0.6], vec![0.9]]), m(vec![vec![0.05]])).unwrap()
}

fn fixed_model() -> Model {
    let mut model = Model::new();
    model.add(first_linear());
    model.add(Activation::relu());
    model.add(second_linear());
    model
}

fn data() -> (Matrix, Matrix) {
    (
        m(vec![vec![1.0, 2.0], vec![-1.0, 0.5], vec![0.3, -0.7]]),
        m(vec![vec![1.0], vec![0.0], vec![0.5]]),
    )
}

#[test]
fn predict_is_composition_of_layer_forwards() {
    let (x, _) = data();
    let mut l1 = first_linear();
    let mut relu = Activation::relu();
    let mut l2 = second_linear();
    let expected = l2.forward(&relu.forward(&l1.forward(&x).unwrap()).unwrap()).unwrap();

    let mut model = fixed_model();
    assert_eq!(model.predict(&x).unwrap(), expected);
}

#[test]
fn predict_does_not_change_parameters() {
    let (x, _) = data();
    let mut model = fixed_model();
    let first = model.predict(&x).unwrap();
    let second = model.predict(&x).unwrap();
    assert_eq!(first, second);
    assert!(model.loss_history().is_empty());
}

#[test]
fn predict_on_empty_model_is_an_error() {
    let mut model = Model::new();
    let err = model.predict(&Matrix::zeros(1, 2)).unwrap_err();
    assert!(matches!(err, Error::EmptyModel));
    assert_eq!(err.to_string(), "model has no layers");
}

#[test]
fn unsupported_loss_fails_before_touching_parameters() {
    let (x, y) = data();
    let log: CallLog = Rc::default();
    let mut model = Model::new();
    model.add(Layer::parametric(RecordingLinear { tag: "l1", inner: first_linear(), log: log.clone() }));
    model.add(Layer::plain(RecordingPlain { tag: "relu", inner: Activation::relu(), log: log.clone() }));
    model.add(Layer::parametric(RecordingLinear { tag: "l2", inner: second_linear(), log: log.clone() }));

    let err = model.train(&x, &y, 0.1, 10, "Hinge", false).unwrap_err();
    match &err {
        Error::UnsupportedLoss(name) => assert_eq!(name, "Hinge"),
        other => panic!("expected UnsupportedLoss, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Hinge is not supported");
    assert!(log.borrow().is_empty());
    assert!(model.loss_history().is_empty());

    // Parameters are untouched: predictions match a fresh copy.
    let mut reference = fixed_model();
    assert_eq!(model.predict(&x).unwrap(), reference.predict(&x).unwrap());
}

#[test]
fn one_epoch_records_loss_of_pre_update_output() {
    let (x, y) = data();
    let mut model = fixed_model();
    let before = model.predict(&x).unwrap();
    let expected = MeanSquaredError::new(&before, &y).unwrap().forward();

    model.train(&x, &y, 0.1, 1, "MeanSquaredError", false).unwrap();

    assert_eq!(model.loss_history().len(), 1);
    assert!(close(model.loss_history()[0], expected));
    assert_ne!(model.predict(&x).unwrap(), before);
}

#[test]
fn history_grows_by_one_per_epoch() {
    let (x, y) = data();
    let mut model = fixed_model();
    model.train(&x, &y, 0.05, 7, "MeanSquaredError", false).unwrap();
    assert_eq!(model.loss_history().len(), 7);
    model.train(&x, &y, 0.05, 3, "MeanSquaredError", false).unwrap();
    assert_eq!(model.loss_history().len(), 10);
}

#[test]
fn run_epoch_is_deterministic() {
    let (x, y) = data();
    let mut a = fixed_model();
    let mut b = fixed_model();

    let ea = a.run_epoch(&x, &y, 0.1, LossType::MeanSquaredError).unwrap();
    let eb = b.run_epoch(&x, &y, 0.1, LossType::MeanSquaredError).unwrap();

    assert_eq!(ea, eb);
    assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    assert_eq!(a.loss_history(), b.loss_history());
}

#[test]
fn backward_runs_in_reverse_with_fused_updates() {
    let (x, y) = data();
    let log: CallLog = Rc::default();
    let mut model = Model::new();
    model.add(Layer::parametric(RecordingLinear { tag: "l1", inner: first_linear(), log: log.clone() }));
    model.add(Layer::plain(RecordingPlain { tag: "relu", inner: Activation::relu(), log: log.clone() }));
    model.add(Layer::parametric(RecordingLinear { tag: "l2", inner: second_linear(), log: log.clone() }));

    model.train(&x, &y, 0.1, 1, "MeanSquaredError", false).unwrap();

    let log = log.borrow();
    let calls: Vec<&str> = log.iter().map(|(call, _)| call.as_str()).collect();
    assert_eq!(
        calls,
        vec![
            "l1.forward",
            "relu.forward",
            "l2.forward",
            "l2.backward",
            "l2.optimize",
            "relu.backward",
            "l1.backward",
            "l1.optimize",
        ]
    );

    // The gradient l2 hands back is exactly what relu receives.
    assert_eq!(log[3].1, log[5].1);
}

#[test]
fn upstream_gradient_uses_weights_from_before_the_update() {
    let (x, y) = data();
    let log: CallLog = Rc::default();
    let linear = Linear::from_parameters(m(vec![vec![2.0], vec![-1.0]]), m(vec![vec![0.0]])).unwrap();
    let identity = Activation::new(ActivationFunction::Identity);

    let mut model = Model::new();
    model.add(Layer::plain(RecordingPlain { tag: "id", inner: identity, log: log.clone() }));
    model.add(Layer::parametric(RecordingLinear { tag: "l", inner: linear, log: log.clone() }));

    model.run_epoch(&x, &y, 0.5, LossType::MeanSquaredError).unwrap();

    let log = log.borrow();
    let received = &log.iter().find(|(call, _)| call == "id.backward").unwrap().1;
    // Each row is dL/dout times the old Wᵀ = [2, -1].
    for row in &received.data {
        assert!(close(row[0], -2.0 * row[1]));
    }
}

#[test]
fn single_linear_mse_step_matches_hand_computation() {
    let layer = Rc::new(RefCell::new(
        Linear::from_parameters(m(vec![vec![1.0], vec![1.0]]), m(vec![vec![0.0]])).unwrap(),
    ));
    let mut model = Model::new();
    model.add(Layer::parametric(SharedLinear(layer.clone())));

    let x = m(vec![vec![1.0, 1.0]]);
    let y = m(vec![vec![1.0]]);
    model.train(&x, &y, 0.1, 1, "MeanSquaredError", false).unwrap();

    // output 2, loss (2 - 1)² = 1, dL/dout = 2, dW = [2, 2]ᵀ, db = 2.
    assert_eq!(model.loss_history(), &[1.0]);
    let layer = layer.borrow();
    assert!(close(layer.weights().data[0][0], 0.8));
    assert!(close(layer.weights().data[1][0], 0.8));
    assert!(close(layer.biases().data[0][0], -0.2));
    drop(layer);

    let prediction = model.predict(&x).unwrap();
    assert!(close(prediction.data[0][0], 1.4));
}

#[test]
fn layer_width_mismatch_surfaces_as_shape_error() {
    let (x, y) = data();
    let mut model = Model::new();
    model.add(Linear::new(2, 3));
    model.add(Linear::new(2, 1));
    let err = model.train(&x, &y, 0.1, 5, "MeanSquaredError", false).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert!(model.loss_history().is_empty());
}

#[test]
fn predict_rejects_uneven_rows() {
    let mut model = Model::new();
    model.add(Linear::new(2, 1));
    let ragged = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]);
    let err = model.predict(&ragged).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { what: "matrix row", .. }));
}

#[test]
fn train_rejects_uneven_target_rows() {
    let mut model = Model::new();
    model.add(Linear::new(2, 1));
    let before = model.predict(&Matrix::zeros(1, 2)).unwrap();
    let x = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    let y = Matrix::from_data(vec![vec![1.0], vec![]]);

    let err = model.train(&x, &y, 0.1, 5, "MeanSquaredError", false).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert!(model.loss_history().is_empty());
    assert_eq!(model.predict(&Matrix::zeros(1, 2)).unwrap(), before);

    // Going through `run_epoch` directly hits the check in the loss.
    let err = model.run_epoch(&x, &y, 0.1, LossType::MeanSquaredError).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert!(model.loss_history().is_empty());
}

#[test]
fn tampered_row_count_is_caught_before_any_epoch() {
    let mut model = fixed_model();
    let (mut x, y) = data();
    x.rows += 1;
    let err = model.train(&x, &y, 0.1, 5, "MeanSquaredError", false).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { what: "matrix rows", .. }));
    assert!(model.loss_history().is_empty());
}
