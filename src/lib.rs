//! HR Payroll Engine
//!
//! This crate keeps employee records and daily attendance, evaluates
//! absences and late arrivals against a configurable policy, and generates
//! monthly payroll records whose net salary always equals the basic salary
//! minus deductions plus allowances.
//!
//! The [`service::PayrollService`] is the entry point; [`api`] exposes it
//! over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
