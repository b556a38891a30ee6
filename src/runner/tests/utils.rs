use approx::assert_abs_diff_eq;
use chrono::{NaiveDate, NaiveDateTime};

use crate::assert_err;
use crate::runner::{
    HyperparameterValue, LrSchedule, RunArgs, RunnerError, float2str, make_run_name,
    make_run_name_at,
};

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap()
}

#[test]
fn test_float2str() {
    assert_eq!(float2str(0.001), "1.e-03");
    assert_eq!(float2str(0.5), "5.e-01");
    assert_eq!(float2str(123.0), "1.23e+02");
    assert_eq!(float2str(0.0), "0.e+00");
    assert_eq!(float2str(-2.5e-7), "-2.5e-07");
    assert_eq!(float2str(1e100), "1.e+100");
    assert_eq!(float2str(0.123456789012), "1.2345678901e-01");
}

#[test]
fn test_run_name_constant_lr() {
    let mut args = RunArgs::new("quadratic_deep", 128, 10, 0.01);
    args.optimizer_hyperparams
        .insert("nesterov".to_string(), HyperparameterValue::Bool(false));
    args.optimizer_hyperparams
        .insert("momentum".to_string(), HyperparameterValue::Float(0.9));

    let (folder, file) = make_run_name_at(&args, timestamp()).unwrap();
    // 超参数按名称排序
    assert_eq!(
        folder,
        "num_epochs__10__batch_size__128__momentum__9.e-01__nesterov__False__lr__1.e-02"
    );
    assert_eq!(file, "random_seed__42__2024-03-05-07-08-09");
}

#[test]
fn test_run_name_value_spelling() {
    let mut args = RunArgs::new("quadratic_deep", 128, 10, 0.01);
    args.optimizer_hyperparams
        .insert("nesterov".to_string(), HyperparameterValue::Bool(true));
    args.optimizer_hyperparams
        .insert("momentum".to_string(), HyperparameterValue::Int(1));

    let (folder, _) = make_run_name_at(&args, timestamp()).unwrap();
    assert!(folder.contains("__momentum__1__"), "{folder}");
    assert!(folder.contains("__nesterov__True__"), "{folder}");
}

#[test]
fn test_run_name_with_schedule_and_weight_decay() {
    let mut args = RunArgs::new("cifar10_vgg16", 128, 350, 0.3);
    args.weight_decay = Some(5e-4);
    args.random_seed = 7;
    args.lr_sched_epochs = Some(vec![50, 100]);
    args.lr_sched_factors = Some(vec![0.1, 0.01]);
    args.optimizer_hyperparams
        .insert("steps".to_string(), HyperparameterValue::Int(3));

    let (folder, file) = make_run_name_at(&args, timestamp()).unwrap();
    assert_eq!(
        folder,
        "num_epochs__350__batch_size__128__weight_decay__5.e-04__steps__3__\
         lr_schedule__0_3.e-01_50_3.e-02_100_3.e-03"
    );
    assert_eq!(file, "random_seed__7__2024-03-05-07-08-09");
}

#[test]
fn test_run_name_rejects_half_schedule() {
    let mut args = RunArgs::new("mnist", 32, 1, 0.1);
    args.lr_sched_epochs = Some(vec![5]);
    assert_err!(make_run_name(&args), RunnerError::InvalidLrSchedule(_));
}

#[test]
fn test_lr_schedule_factor() {
    let schedule = LrSchedule::new(vec![50, 100], vec![0.1, 0.01]).unwrap();
    assert!(!schedule.is_constant());
    assert_eq!(schedule.factor(0), 1.0);
    assert_eq!(schedule.factor(49), 1.0);
    assert_eq!(schedule.factor(50), 0.1);
    assert_eq!(schedule.factor(99), 0.1);
    assert_eq!(schedule.factor(100), 0.01);
    assert_eq!(schedule.factor(1000), 0.01);
    assert_abs_diff_eq!(schedule.learning_rate(0.5, 75), 0.05, epsilon = 1e-12);
    assert_eq!(
        schedule.milestones().collect::<Vec<_>>(),
        vec![(50, 0.1), (100, 0.01)]
    );

    let constant = LrSchedule::constant();
    assert!(constant.is_constant());
    assert_eq!(constant.learning_rate(0.3, 1000), 0.3);
}

#[test]
fn test_lr_schedule_validation() {
    assert_err!(LrSchedule::new(vec![], vec![]), RunnerError::InvalidLrSchedule(_));
    assert_err!(
        LrSchedule::new(vec![10, 20], vec![0.1]),
        RunnerError::InvalidLrSchedule(_)
    );
    assert_err!(
        LrSchedule::new(vec![20, 10], vec![0.1, 0.01]),
        RunnerError::InvalidLrSchedule(_)
    );
    assert_err!(
        LrSchedule::new(vec![10, 10], vec![0.1, 0.01]),
        RunnerError::InvalidLrSchedule(_)
    );
    assert_err!(
        LrSchedule::new(vec![10], vec![f64::NAN]),
        RunnerError::InvalidLrSchedule(_)
    );

    assert_eq!(LrSchedule::from_options(None, None).unwrap(), LrSchedule::constant());
    assert_err!(
        LrSchedule::from_options(None, Some(&[0.1])),
        RunnerError::InvalidLrSchedule(_)
    );
    assert!(LrSchedule::from_options(Some(&[3]), Some(&[0.5])).is_ok());
}
