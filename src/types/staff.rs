//! Staff records used as ride operators

use serde::{Deserialize, Serialize};
use std::fmt;

/// A park employee who can be assigned to operate a ride
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Full name of the employee
    pub name: String,
    /// Age in years
    pub age: i32,
    /// Free-form gender description
    pub gender: String,
    /// Employee identifier, e.g. "E1001"
    pub employee_id: String,
    /// Department the employee belongs to
    pub department: String,
    /// Job position
    pub position: String,
}

impl StaffRecord {
    /// Create a new staff record
    pub fn new(
        name: impl Into<String>,
        age: i32,
        gender: impl Into<String>,
        employee_id: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            gender: gender.into(),
            employee_id: employee_id.into(),
            department: department.into(),
            position: position.into(),
        }
    }
}

impl Default for StaffRecord {
    fn default() -> Self {
        Self::new("John Smith", 28, "Male", "E1001", "Ride Operations", "Operator")
    }
}

impl fmt::Display for StaffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Employee [Name: {}, Age: {}, Gender: {}, ID: {}, Department: {}, Position: {}]",
            self.name, self.age, self.gender, self.employee_id, self.department, self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_staff_record() {
        let staff = StaffRecord::default();
        assert_eq!(staff.employee_id, "E1001");
        assert_eq!(staff.position, "Operator");
    }

    #[test]
    fn test_staff_display() {
        let staff = StaffRecord::new("Sarah Johnson", 35, "Female", "E1002", "Management", "Supervisor");
        assert_eq!(
            staff.to_string(),
            "Employee [Name: Sarah Johnson, Age: 35, Gender: Female, ID: E1002, Department: Management, Position: Supervisor]"
        );
    }
}
