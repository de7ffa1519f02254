
///A simple matrix struct. Used for the distance matrix between routers of a topology.
#[derive(Debug,Clone,PartialEq)]
pub struct Matrix<T>
{
	data: Vec<T>,
	num_columns: usize,
}

impl<T> Matrix<T>
{
	///Read a matrix entry.
	pub fn get(&self,row:usize,column:usize) -> &T
	{
		&self.data[row*self.num_columns+column]
	}
	///Read/write a matrix entry.
	pub fn get_mut(&mut self,row:usize,column:usize) -> &mut T
	{
		&mut self.data[row*self.num_columns+column]
	}
	///Get the number of rows
	pub fn get_rows(&self) -> usize
	{
		if self.num_columns==0 { 0 } else { self.data.len()/self.num_columns }
	}
	///Get the number of columns
	pub fn get_columns(&self) -> usize
	{
		self.num_columns
	}
	///Build a matrix with constant values.
	pub fn constant(value:T,num_rows:usize,num_columns:usize) -> Matrix<T> where T:Clone
	{
		Matrix{
			data: vec![value;num_rows*num_columns],
			num_columns,
		}
	}
	/// Iterate over elements outside the diagonal.
	pub fn outside_diagonal(&self) -> OutsideDiagonal<T>
	{
		OutsideDiagonal{ matrix: self, row:0, column:0 }
	}
}

pub struct OutsideDiagonal<'a, T>
{
	matrix: &'a Matrix<T>,
	row: usize,
	column: usize,
}

impl<'a,T> Iterator for OutsideDiagonal<'a,T>
{
	type Item = &'a T;
	fn next(&mut self) -> Option<<Self as Iterator>::Item>
	{
		let columns = self.matrix.get_columns();
		let rows = self.matrix.get_rows();
		while self.row < rows
		{
			let (row,column) = (self.row,self.column);
			self.column += 1;
			if self.column >= columns
			{
				self.column = 0;
				self.row += 1;
			}
			if row != column
			{
				return Some(self.matrix.get(row,column));
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn outside_diagonal_skips_diagonal()
	{
		let mut matrix = Matrix::constant(0usize,3,3);
		for row in 0..3
		{
			for column in 0..3
			{
				*matrix.get_mut(row,column) = 10*row+column;
			}
		}
		let values:Vec<usize> = matrix.outside_diagonal().cloned().collect();
		assert_eq!(values,vec![1,2,10,12,20,21]);
		let single = Matrix::constant(7usize,1,1);
		assert_eq!(single.outside_diagonal().count(),0);
		let empty:Matrix<usize> = Matrix::constant(0,0,0);
		assert_eq!(empty.outside_diagonal().count(),0);
	}
}
