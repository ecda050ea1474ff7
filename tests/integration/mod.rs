mod basic_integration;
mod report_workflow;
