use std::cmp::Ordering;

use crate::models::Student;

/// Re-derives class order from `average_grade`, highest first.
///
/// Each student's incoming `rank` becomes its `previous_rank`. Equal
/// averages are ordered by incoming rank, so the incumbent keeps the better
/// rank whatever order the students arrive in; equal ranks keep input order.
pub fn rank_students(mut students: Vec<Student>) -> Vec<Student> {
    for student in students.iter_mut() {
        student.previous_rank = student.rank;
    }

    students.sort_by(|a, b| {
        compare_averages(b.average_grade, a.average_grade)
            .then_with(|| a.previous_rank.cmp(&b.previous_rank))
    });

    for (index, student) in students.iter_mut().enumerate() {
        student.rank = index as u32 + 1;
    }

    students
}

fn compare_averages(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Share of the class at or below this rank, as a whole percent.
pub fn top_percent(rank: u32, class_size: usize) -> u32 {
    if class_size == 0 || rank == 0 {
        return 0;
    }
    let class_size = class_size as f64;
    ((class_size - f64::from(rank) + 1.0) / class_size * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, average: f64, rank: u32) -> Student {
        let mut student = Student::new(id, id, format!("{id}@school.edu"));
        student.average_grade = average;
        student.total_score = average;
        student.assignments = 1;
        student.rank = rank;
        student.previous_rank = rank;
        student
    }

    fn ranks(students: &[Student]) -> Vec<(&str, u32, u32)> {
        students
            .iter()
            .map(|s| (s.id.as_str(), s.rank, s.previous_rank))
            .collect()
    }

    #[test]
    fn orders_by_average_descending() {
        let ranked = rank_students(vec![
            student("a", 70.0, 1),
            student("b", 90.0, 2),
            student("c", 80.0, 3),
        ]);
        assert_eq!(ranks(&ranked), vec![("b", 1, 2), ("c", 2, 3), ("a", 3, 1)]);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let ranked = rank_students(vec![
            student("a", 85.0, 1),
            student("b", 85.0, 2),
            student("c", 85.0, 3),
        ]);
        assert_eq!(ranks(&ranked), vec![("a", 1, 1), ("b", 2, 2), ("c", 3, 3)]);
    }

    #[test]
    fn ties_go_to_the_better_incoming_rank_regardless_of_position() {
        let ranked = rank_students(vec![
            student("b", 85.0, 2),
            student("a", 85.0, 1),
            student("c", 10.0, 3),
        ]);
        assert_eq!(ranks(&ranked), vec![("a", 1, 1), ("b", 2, 2), ("c", 3, 3)]);
    }

    #[test]
    fn reranking_own_output_is_idempotent() {
        let once = rank_students(vec![
            student("a", 60.0, 1),
            student("b", 95.0, 2),
            student("c", 60.0, 3),
            student("d", 75.5, 4),
        ]);
        let twice = rank_students(once.clone());

        let once_ranks: Vec<(&str, u32)> = once.iter().map(|s| (s.id.as_str(), s.rank)).collect();
        let twice_ranks: Vec<(&str, u32)> =
            twice.iter().map(|s| (s.id.as_str(), s.rank)).collect();
        assert_eq!(once_ranks, twice_ranks);
        assert!(twice.iter().all(|s| s.previous_rank == s.rank));
    }

    #[test]
    fn empty_class_ranks_to_empty() {
        assert!(rank_students(Vec::new()).is_empty());
    }

    #[test]
    fn top_percent_matches_class_position() {
        assert_eq!(top_percent(1, 8), 100);
        assert_eq!(top_percent(8, 8), 13);
        assert_eq!(top_percent(4, 8), 63);
        assert_eq!(top_percent(1, 1), 100);
        assert_eq!(top_percent(1, 0), 0);
    }
}
