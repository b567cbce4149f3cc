pub mod wecom_robot;
