pub mod termination_coordinator;
