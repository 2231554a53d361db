//! Simulation harness for balancers
