pub mod retention_evaluator;
