pub mod u501_check_email;
